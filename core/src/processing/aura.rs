use crate::interface::{Classification, TagId};
use crate::math::geometry::{AuraShape, Ellipse};
use crate::prelude::Position;
use crate::processing::trail::TagTracker;

/// Authorization ellipses around every tag's current position, rebuilt each
/// tick.
#[derive(Debug, Clone, Default)]
pub struct AuraZoneIndex {
    zones: Vec<(TagId, Ellipse)>,
}

impl AuraZoneIndex {
    pub fn build(tracker: &TagTracker, shape: AuraShape) -> Self {
        let zones = tracker
            .current_positions()
            .map(|(id, position)| (id.clone(), Ellipse::around(position, shape)))
            .collect();
        Self { zones }
    }

    pub fn zone(&self, tag_id: &TagId) -> Option<&Ellipse> {
        self.zones
            .iter()
            .find(|(id, _)| id == tag_id)
            .map(|(_, ellipse)| ellipse)
    }

    pub fn zones(&self) -> impl Iterator<Item = &Ellipse> {
        self.zones.iter().map(|(_, ellipse)| ellipse)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

/// Labels ranging points by aura membership.
pub struct PointClassifier<'a> {
    index: &'a AuraZoneIndex,
}

impl<'a> PointClassifier<'a> {
    pub fn new(index: &'a AuraZoneIndex) -> Self {
        Self { index }
    }

    pub fn classify(&self, point: &Position) -> Classification {
        if self.index.zones().any(|zone| zone.contains(point)) {
            Classification::Tagged
        } else {
            Classification::Untagged
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHAPE: AuraShape = AuraShape {
        radius_x: 1.0,
        radius_y: 10.0,
    };

    fn tracker_with(positions: &[(&str, Position)]) -> TagTracker {
        let mut tracker = TagTracker::new(3.0);
        for (raw, position) in positions {
            tracker.update(&TagId::parse(raw).unwrap(), *position, 0.0);
        }
        tracker
    }

    #[test]
    fn empty_index_classifies_everything_untagged() {
        let index = AuraZoneIndex::build(&TagTracker::new(3.0), SHAPE);
        let classifier = PointClassifier::new(&index);
        assert!(index.is_empty());
        assert_eq!(
            classifier.classify(&Position::new(0.0, 0.0)),
            Classification::Untagged
        );
    }

    #[test]
    fn point_inside_any_zone_is_tagged() {
        let tracker = tracker_with(&[
            ("AAAAAAAAAAAA", Position::new(3.0, -15.0)),
            ("BBBBBBBBBBBB", Position::new(8.0, -30.0)),
        ]);
        let index = AuraZoneIndex::build(&tracker, SHAPE);
        let classifier = PointClassifier::new(&index);
        assert_eq!(index.len(), 2);
        assert_eq!(
            classifier.classify(&Position::new(3.5, -10.0)),
            Classification::Tagged
        );
        assert_eq!(
            classifier.classify(&Position::new(8.0, -39.0)),
            Classification::Tagged
        );
        assert_eq!(
            classifier.classify(&Position::new(5.5, -15.0)),
            Classification::Untagged
        );
    }

    #[test]
    fn zone_is_centered_on_latest_position() {
        let mut tracker = TagTracker::new(3.0);
        let id = TagId::parse("AAAAAAAAAAAA").unwrap();
        tracker.update(&id, Position::new(0.0, 0.0), 0.0);
        tracker.update(&id, Position::new(2.0, -4.0), 1.0);
        let index = AuraZoneIndex::build(&tracker, SHAPE);
        assert_eq!(index.zone(&id).unwrap().center, Position::new(2.0, -4.0));
    }
}
