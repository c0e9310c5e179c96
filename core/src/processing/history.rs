use crate::interface::{Classification, PointRemoved};
use crate::prelude::{Position, Timestamp};
use crate::processing::aura::PointClassifier;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Exact-coordinate identity of a ranging point. `-0.0` and `0.0` are the
/// same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointKey(u64, u64);

impl PointKey {
    pub fn of(position: &Position) -> Self {
        fn bits(value: f64) -> u64 {
            if value == 0.0 {
                0.0_f64.to_bits()
            } else {
                value.to_bits()
            }
        }
        Self(bits(position.x), bits(position.y))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointRecord {
    pub position: Position,
    pub last_seen: Timestamp,
    pub classification: Classification,
}

/// Persistence table for ranging points, in first-sighting order.
pub struct PointHistory {
    persistence_duration: f64,
    records: BTreeMap<u64, PointRecord>,
    index: HashMap<PointKey, u64>,
    next_seq: u64,
}

/// Result of one ingest pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryUpdate {
    /// Records still presented to the detector this tick.
    pub active: Vec<PointRecord>,
    pub removed: Vec<PointRemoved>,
}

impl PointHistory {
    pub fn new(persistence_duration: f64) -> Self {
        Self {
            persistence_duration,
            records: BTreeMap::new(),
            index: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Classifies and upserts every incoming point, then sweeps records that
    /// were not refreshed and have outlived the persistence window.
    pub fn ingest(
        &mut self,
        points: &[Position],
        classifier: &PointClassifier<'_>,
        now: Timestamp,
    ) -> HistoryUpdate {
        let mut refreshed = HashSet::with_capacity(points.len());

        for point in points {
            let classification = classifier.classify(point);
            let key = PointKey::of(point);
            let seq = match self.index.get(&key) {
                Some(&seq) => seq,
                None => {
                    let seq = self.next_seq;
                    self.next_seq += 1;
                    self.index.insert(key, seq);
                    seq
                }
            };
            self.records.insert(
                seq,
                PointRecord {
                    position: *point,
                    last_seen: now,
                    classification,
                },
            );
            refreshed.insert(seq);
        }

        let window = self.persistence_duration;
        let expired: Vec<u64> = self
            .records
            .iter()
            .filter(|(seq, record)| !refreshed.contains(*seq) && now - record.last_seen > window)
            .map(|(seq, _)| *seq)
            .collect();

        let mut removed = Vec::with_capacity(expired.len());
        for seq in expired {
            if let Some(record) = self.records.remove(&seq) {
                self.index.remove(&PointKey::of(&record.position));
                removed.push(PointRemoved {
                    point: record.position,
                });
            }
        }

        HistoryUpdate {
            active: self.records.values().copied().collect(),
            removed,
        }
    }

    pub fn get(&self, position: &Position) -> Option<&PointRecord> {
        self.index
            .get(&PointKey::of(position))
            .and_then(|seq| self.records.get(seq))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::aura::AuraZoneIndex;

    fn ingest_untagged(history: &mut PointHistory, points: &[Position], now: f64) -> HistoryUpdate {
        let index = AuraZoneIndex::default();
        let classifier = PointClassifier::new(&index);
        history.ingest(points, &classifier, now)
    }

    #[test]
    fn resighting_refreshes_instead_of_duplicating() {
        let mut history = PointHistory::new(2.0);
        let p = Position::new(3.0, -12.0);
        ingest_untagged(&mut history, &[p], 0.0);
        let update = ingest_untagged(&mut history, &[p], 1.0);
        assert_eq!(update.active.len(), 1);
        assert_eq!(history.get(&p).unwrap().last_seen, 1.0);
    }

    #[test]
    fn nearby_coordinates_are_distinct_records() {
        let mut history = PointHistory::new(2.0);
        let update = ingest_untagged(
            &mut history,
            &[Position::new(3.0, -12.0), Position::new(3.0001, -12.0)],
            0.0,
        );
        assert_eq!(update.active.len(), 2);
    }

    #[test]
    fn signed_zero_is_one_identity() {
        let mut history = PointHistory::new(2.0);
        ingest_untagged(&mut history, &[Position::new(0.0, -5.0)], 0.0);
        ingest_untagged(&mut history, &[Position::new(-0.0, -5.0)], 0.5);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn stale_point_is_kept_within_persistence_then_evicted_once() {
        let mut history = PointHistory::new(2.0);
        let p = Position::new(3.0, -12.0);
        ingest_untagged(&mut history, &[p], 0.0);

        let update = ingest_untagged(&mut history, &[], 2.0);
        assert_eq!(update.active.len(), 1);
        assert!(update.removed.is_empty());

        let update = ingest_untagged(&mut history, &[], 2.1);
        assert!(update.active.is_empty());
        assert_eq!(update.removed, vec![PointRemoved { point: p }]);

        let update = ingest_untagged(&mut history, &[], 5.0);
        assert!(update.removed.is_empty());
        assert!(history.is_empty());
    }

    #[test]
    fn active_set_keeps_first_sighting_order() {
        let mut history = PointHistory::new(2.0);
        let a = Position::new(1.0, 1.0);
        let b = Position::new(2.0, 2.0);
        ingest_untagged(&mut history, &[a], 0.0);
        let update = ingest_untagged(&mut history, &[b, a], 0.1);
        let order: Vec<Position> = update.active.iter().map(|r| r.position).collect();
        assert_eq!(order, vec![a, b]);
    }
}
