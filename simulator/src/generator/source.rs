use crate::generator::profile::{Lane, ScheduledEvent};
use aurafuse::interface::InboundEvent;
use aurafuse::runtime::{Clock, EventSource, SystemClock, TransportError};
use std::collections::VecDeque;
use std::thread;
use std::time::{Duration, Instant};

/// Replays one lane of a scenario in real time, stamping bearings with the
/// wall clock on arrival the way a serial reader would.
pub struct ScriptedSource {
    lane: Lane,
    script: VecDeque<ScheduledEvent>,
    started: Option<Instant>,
    clock: SystemClock,
}

impl ScriptedSource {
    pub fn new(lane: Lane, events: &[ScheduledEvent]) -> Self {
        let script = events
            .iter()
            .filter(|event| event.lane == lane)
            .cloned()
            .collect();
        Self {
            lane,
            script,
            started: None,
            clock: SystemClock,
        }
    }

    #[cfg(test)]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    fn stamp(&self, event: InboundEvent) -> InboundEvent {
        match event {
            InboundEvent::Azimuth(mut reading) => {
                reading.timestamp = self.clock.now();
                InboundEvent::Azimuth(reading)
            }
            other => other,
        }
    }
}

impl EventSource for ScriptedSource {
    fn name(&self) -> &str {
        self.lane.name()
    }

    fn connect(&mut self) -> Result<(), TransportError> {
        if self.started.is_none() {
            self.started = Some(Instant::now());
        }
        Ok(())
    }

    fn read(&mut self, timeout: Duration) -> Result<Option<InboundEvent>, TransportError> {
        let started = self
            .started
            .ok_or_else(|| TransportError::Read("source not connected".into()))?;
        let Some(next) = self.script.front() else {
            thread::sleep(timeout);
            return Ok(None);
        };

        let due = started + Duration::from_secs_f64(next.at.max(0.0));
        let now = Instant::now();
        if due > now {
            let wait = due - now;
            if wait > timeout {
                thread::sleep(timeout);
                return Ok(None);
            }
            thread::sleep(wait);
        }

        Ok(self
            .script
            .pop_front()
            .map(|scheduled| self.stamp(scheduled.event)))
    }
}
