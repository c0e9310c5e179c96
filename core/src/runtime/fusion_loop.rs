use crate::interface::{InboundEvent, TickReport};
use crate::processing::FusionEngine;
use crate::runtime::clock::Clock;
use crate::runtime::signal::StopSignal;
use log::{debug, info};
use std::time::Duration;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::time::{self, MissedTickBehavior};

/// Sole consumer of the inbound queue and sole owner of the tracking state.
pub struct FusionLoop<C: Clock> {
    engine: FusionEngine,
    inbound: UnboundedReceiver<InboundEvent>,
    outbound: UnboundedSender<TickReport>,
    clock: C,
    period: Duration,
}

impl<C: Clock> FusionLoop<C> {
    pub fn new(
        engine: FusionEngine,
        inbound: UnboundedReceiver<InboundEvent>,
        outbound: UnboundedSender<TickReport>,
        clock: C,
    ) -> Self {
        let period = Duration::from_millis(engine.config().tick_period_ms.max(1));
        Self {
            engine,
            inbound,
            outbound,
            clock,
            period,
        }
    }

    /// Takes whatever is queued right now without waiting for more.
    pub fn drain(&mut self) -> Vec<InboundEvent> {
        let mut events = Vec::new();
        loop {
            match self.inbound.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        events
    }

    pub fn tick_once(&mut self) -> TickReport {
        let events = self.drain();
        let now = self.clock.now();
        self.engine.tick(events, now)
    }

    /// Ticks at the configured period until `stop` fires, then hands the
    /// engine back.
    pub async fn run(mut self, stop: StopSignal) -> FusionEngine {
        let mut interval = time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            target: "aurafuse::loop",
            "fusion loop running every {} ms",
            self.period.as_millis()
        );

        while !stop.is_stopped() {
            interval.tick().await;
            let report = self.tick_once();
            if self.outbound.send(report).is_err() {
                debug!(target: "aurafuse::loop", "no report consumer attached");
            }
        }

        info!(target: "aurafuse::loop", "fusion loop stopped");
        self.engine
    }
}
