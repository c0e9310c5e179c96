use crate::interface::InboundEvent;
use crate::runtime::signal::StopSignal;
use crate::telemetry::LogManager;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("cannot open {0}")]
    Connect(String),
    #[error("read failed: {0}")]
    Read(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Blocking producer of decoded events (a serial port plus its decoder, a
/// replay file, a generator).
pub trait EventSource: Send {
    fn name(&self) -> &str;

    fn connect(&mut self) -> Result<(), TransportError>;

    /// Waits at most `timeout` for the next event. `Ok(None)` on timeout.
    fn read(&mut self, timeout: Duration) -> Result<Option<InboundEvent>, TransportError>;
}

#[derive(Debug, Clone, Copy)]
pub struct LaneSettings {
    pub read_timeout: Duration,
    pub retry_delay: Duration,
}

impl Default for LaneSettings {
    fn default() -> Self {
        Self {
            read_timeout: Duration::from_secs(1),
            retry_delay: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LaneStats {
    pub events: u64,
    pub failures: u64,
}

/// Reads from `source` until the stop signal fires or the consumer goes
/// away. Transport failures are logged and retried forever after
/// `retry_delay`.
pub fn run_lane<S: EventSource>(
    mut source: S,
    sender: UnboundedSender<InboundEvent>,
    stop: StopSignal,
    settings: LaneSettings,
) -> LaneStats {
    let logger = LogManager::new("aurafuse::lane");
    let retry_ms = settings.retry_delay.as_millis() as u64;
    let mut stats = LaneStats::default();

    while !stop.is_stopped() {
        if let Err(err) = source.connect() {
            stats.failures += 1;
            logger.transport_failure(source.name(), &err, retry_ms);
            stop.sleep(settings.retry_delay);
            continue;
        }
        logger.record(&format!("listening on {}", source.name()));

        while !stop.is_stopped() {
            match source.read(settings.read_timeout) {
                Ok(Some(event)) => {
                    if sender.send(event).is_err() {
                        logger.detail(&format!("{}: consumer closed, stopping", source.name()));
                        return stats;
                    }
                    stats.events += 1;
                }
                Ok(None) => {}
                Err(err) => {
                    stats.failures += 1;
                    logger.transport_failure(source.name(), &err, retry_ms);
                    stop.sleep(settings.retry_delay);
                    break;
                }
            }
        }
    }

    logger.detail(&format!("{} stopped", source.name()));
    stats
}

/// Runs [`run_lane`] on a dedicated OS thread.
pub fn spawn_lane<S>(
    source: S,
    sender: UnboundedSender<InboundEvent>,
    stop: StopSignal,
    settings: LaneSettings,
) -> std::io::Result<JoinHandle<LaneStats>>
where
    S: EventSource + 'static,
{
    let name = format!("lane-{}", source.name());
    thread::Builder::new()
        .name(name)
        .spawn(move || run_lane(source, sender, stop, settings))
}
