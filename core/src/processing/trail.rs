use crate::interface::{TagId, TrailEntry};
use crate::prelude::{Position, Timestamp};
use std::collections::{BTreeMap, VecDeque};

/// Time-windowed trail of positions for every tag ever triangulated.
///
/// Tags are never removed; a tag whose trail has not been updated keeps its
/// last entries until its next update prunes them.
///
/// The trail window is measured from the tag's newest fix, not from the
/// tick clock, so a silent tag keeps a tip (and an aura) older than
/// `trail_duration`.
pub struct TagTracker {
    trail_duration: f64,
    trails: BTreeMap<TagId, VecDeque<TrailEntry>>,
}

impl TagTracker {
    pub fn new(trail_duration: f64) -> Self {
        Self {
            trail_duration,
            trails: BTreeMap::new(),
        }
    }

    /// Appends the fix, then drops entries older than the trail window
    /// relative to `timestamp`.
    pub fn update(&mut self, tag_id: &TagId, position: Position, timestamp: Timestamp) {
        let trail = self.trails.entry(tag_id.clone()).or_default();
        trail.push_back(TrailEntry {
            timestamp,
            position,
        });
        let window = self.trail_duration;
        trail.retain(|entry| timestamp - entry.timestamp <= window);
    }

    pub fn current_position(&self, tag_id: &TagId) -> Option<Position> {
        self.trails
            .get(tag_id)
            .and_then(|trail| trail.back())
            .map(|entry| entry.position)
    }

    pub fn trail(&self, tag_id: &TagId) -> impl Iterator<Item = &TrailEntry> {
        self.trails.get(tag_id).into_iter().flatten()
    }

    /// Every known tag with its latest position, in id order.
    pub fn current_positions(&self) -> impl Iterator<Item = (&TagId, Position)> {
        self.trails
            .iter()
            .filter_map(|(id, trail)| trail.back().map(|entry| (id, entry.position)))
    }

    pub fn tag_ids(&self) -> impl Iterator<Item = &TagId> {
        self.trails.keys()
    }

    pub fn len(&self) -> usize {
        self.trails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trails.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(raw: &str) -> TagId {
        TagId::parse(raw).unwrap()
    }

    #[test]
    fn trail_keeps_window_in_arrival_order() {
        let mut tracker = TagTracker::new(3.0);
        let id = tag("AAAAAAAAAAAA");
        for t in 0..=4 {
            tracker.update(&id, Position::new(t as f64, 0.0), t as f64);
        }
        let stamps: Vec<f64> = tracker.trail(&id).map(|e| e.timestamp).collect();
        assert_eq!(stamps, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(tracker.current_position(&id), Some(Position::new(4.0, 0.0)));
    }

    #[test]
    fn trails_are_independent_per_tag() {
        let mut tracker = TagTracker::new(3.0);
        let a = tag("AAAAAAAAAAAA");
        let b = tag("BBBBBBBBBBBB");
        tracker.update(&a, Position::new(0.0, 0.0), 0.0);
        tracker.update(&b, Position::new(1.0, 1.0), 10.0);
        // b's update must not prune a's trail
        assert_eq!(tracker.trail(&a).count(), 1);
        assert_eq!(tracker.current_positions().count(), 2);
    }

    #[test]
    fn unknown_tag_has_no_position() {
        let tracker = TagTracker::new(3.0);
        assert!(tracker.current_position(&tag("CCCCCCCCCCCC")).is_none());
        assert_eq!(tracker.trail(&tag("CCCCCCCCCCCC")).count(), 0);
        assert!(tracker.is_empty());
    }
}
