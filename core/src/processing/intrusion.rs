use crate::interface::{Classification, IntrusionEvent, IntrusionKind, IntrusionStatus};
use crate::prelude::{FusionConfig, ParkingRegion, Position, Timestamp};
use crate::processing::history::{PointKey, PointRecord};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertState {
    Clear,
    Flagged,
}

/// Accumulates spatially unique untagged sightings inside the parking
/// region and raises an alert once there are more than `intruder_threshold`
/// of them. Any tagged sighting in the region cancels the episode. There is
/// no timeout.
pub struct IntrusionDetector {
    region: ParkingRegion,
    proximity_threshold: f64,
    intruder_threshold: usize,
    unique_untagged: Vec<Position>,
    state: AlertState,
    departures: DepartureWatch,
}

impl IntrusionDetector {
    pub fn new(config: &FusionConfig) -> Self {
        Self {
            region: config.parking_region,
            proximity_threshold: config.proximity_threshold,
            intruder_threshold: config.intruder_threshold,
            unique_untagged: Vec::new(),
            state: AlertState::Clear,
            departures: DepartureWatch::new(config.illegal_persistence_duration),
        }
    }

    pub fn state(&self) -> AlertState {
        self.state
    }

    pub fn unique_untagged(&self) -> &[Position] {
        &self.unique_untagged
    }

    pub fn status(&self) -> IntrusionStatus {
        IntrusionStatus {
            flagged: self.state == AlertState::Flagged,
            unique_untagged: self.unique_untagged.len(),
        }
    }

    pub fn region(&self) -> &ParkingRegion {
        &self.region
    }

    fn is_unique(&self, point: &Position) -> bool {
        self.unique_untagged
            .iter()
            .all(|existing| existing.distance_to(point) > self.proximity_threshold)
    }

    fn event(&self, kind: IntrusionKind, now: Timestamp, point: Option<Position>) -> IntrusionEvent {
        IntrusionEvent {
            kind,
            region: self.region,
            timestamp: now,
            relevant_point: point,
        }
    }

    /// Runs one tick over the active point set, in its given order.
    pub fn evaluate(&mut self, active: &[PointRecord], now: Timestamp) -> Vec<IntrusionEvent> {
        let mut events = Vec::new();

        for record in active {
            let point = record.position;
            if !self.region.contains(&point) {
                continue;
            }
            match record.classification {
                Classification::Untagged => {
                    if !self.is_unique(&point) {
                        continue;
                    }
                    self.unique_untagged.push(point);
                    if self.unique_untagged.len() > self.intruder_threshold
                        && self.state == AlertState::Clear
                    {
                        self.state = AlertState::Flagged;
                        events.push(self.event(IntrusionKind::Flagged, now, Some(point)));
                    }
                }
                Classification::Tagged => {
                    if self.state == AlertState::Flagged {
                        events.push(self.event(IntrusionKind::Cleared, now, Some(point)));
                    }
                    self.state = AlertState::Clear;
                    self.unique_untagged.clear();
                }
            }
        }

        let candidates = active
            .iter()
            .filter(|record| record.classification == Classification::Untagged)
            .map(|record| record.position)
            .filter(|point| self.region.contains(point));
        let present = active.iter().map(|record| record.position);
        for point in self.departures.observe(candidates, present, now) {
            events.push(self.event(IntrusionKind::ObjectLeft, now, Some(point)));
        }

        events
    }
}

/// Watches untagged points seen inside the region and reports the ones that
/// stay out of the active set for longer than `absence_limit`, whatever
/// their classification while present. Independent of the detector's flag
/// and unique set.
pub struct DepartureWatch {
    absence_limit: f64,
    registered: HashMap<PointKey, (Position, Timestamp)>,
}

impl DepartureWatch {
    pub fn new(absence_limit: f64) -> Self {
        Self {
            absence_limit,
            registered: HashMap::new(),
        }
    }

    /// Registers (or refreshes) every candidate, refreshes already
    /// registered points found in `present`, then returns (and forgets) the
    /// registered points absent for too long.
    pub fn observe(
        &mut self,
        candidates: impl IntoIterator<Item = Position>,
        present: impl IntoIterator<Item = Position>,
        now: Timestamp,
    ) -> Vec<Position> {
        for point in candidates {
            self.registered.insert(PointKey::of(&point), (point, now));
        }
        for point in present {
            if let Some((_, last_seen)) = self.registered.get_mut(&PointKey::of(&point)) {
                *last_seen = now;
            }
        }

        let limit = self.absence_limit;
        let mut departed: Vec<(Timestamp, Position)> = Vec::new();
        self.registered.retain(|_, (point, last_seen)| {
            if now - *last_seen > limit {
                departed.push((*last_seen, *point));
                false
            } else {
                true
            }
        });
        departed.sort_by(|a, b| a.0.total_cmp(&b.0));
        departed.into_iter().map(|(_, point)| point).collect()
    }

    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }
}
