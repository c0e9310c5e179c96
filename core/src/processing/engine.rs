use crate::interface::{
    InboundEvent, PointView, SceneSnapshot, TagId, TagPositionUpdate, TagView, TickReport,
};
use crate::prelude::{FusionConfig, Position, Timestamp};
use crate::processing::aura::{AuraZoneIndex, PointClassifier};
use crate::processing::history::PointHistory;
use crate::processing::intrusion::IntrusionDetector;
use crate::processing::trail::TagTracker;
use crate::processing::triangulation::Triangulator;
use crate::telemetry::{LogManager, MetricsRecorder};

/// All tracking state, owned by whoever drives the ticks.
pub struct FusionEngine {
    config: FusionConfig,
    triangulator: Triangulator,
    tracker: TagTracker,
    history: PointHistory,
    detector: IntrusionDetector,
    metrics: MetricsRecorder,
    logger: LogManager,
}

impl FusionEngine {
    pub fn new(config: FusionConfig) -> Self {
        Self {
            triangulator: Triangulator::new(&config),
            tracker: TagTracker::new(config.trail_duration),
            history: PointHistory::new(config.persistence_duration),
            detector: IntrusionDetector::new(&config),
            metrics: MetricsRecorder::new(),
            logger: LogManager::new("aurafuse::engine"),
            config,
        }
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    pub fn tracker(&self) -> &TagTracker {
        &self.tracker
    }

    pub fn history(&self) -> &PointHistory {
        &self.history
    }

    pub fn detector(&self) -> &IntrusionDetector {
        &self.detector
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }

    /// Processes every event drained this tick, then runs classification,
    /// persistence and intrusion detection once.
    pub fn tick<I>(&mut self, events: I, now: Timestamp) -> TickReport
    where
        I: IntoIterator<Item = InboundEvent>,
    {
        let mut fresh_tags: Vec<TagId> = Vec::new();
        let mut radar_points: Vec<Position> = Vec::new();
        let mut drained = 0;

        for event in events {
            drained += 1;
            match event {
                InboundEvent::Azimuth(reading) => {
                    self.triangulator.record(&reading);
                    if !fresh_tags.contains(&reading.tag_id) {
                        fresh_tags.push(reading.tag_id);
                    }
                }
                InboundEvent::Radar(batch) => radar_points.extend(batch.points),
            }
        }
        self.metrics.record_tick(drained);

        let mut tag_updates = Vec::with_capacity(fresh_tags.len());
        for tag_id in fresh_tags {
            match self.triangulator.triangulate(&tag_id) {
                Ok(position) => {
                    self.logger.fix(&tag_id, &position);
                    self.metrics.record_fix();
                    self.tracker.update(&tag_id, position, now);
                    tag_updates.push(TagPositionUpdate {
                        tag_id,
                        position,
                        timestamp: now,
                    });
                }
                Err(reason) => {
                    self.logger.rejected_fix(&tag_id, reason);
                    self.metrics.record_rejection(reason);
                }
            }
        }

        let zones = AuraZoneIndex::build(&self.tracker, self.config.aura);
        let classifier = PointClassifier::new(&zones);
        let update = self.history.ingest(&radar_points, &classifier, now);
        if !update.removed.is_empty() {
            self.logger
                .detail(&format!("evicted {} stale points", update.removed.len()));
            self.metrics.record_evictions(update.removed.len());
        }

        let intrusion_events = self.detector.evaluate(&update.active, now);
        for event in &intrusion_events {
            self.logger.intrusion(event);
            self.metrics.record_intrusion(event.kind);
        }

        let points = update
            .active
            .iter()
            .map(|record| PointView {
                position: record.position,
                classification: record.classification,
            })
            .collect();
        let snapshot = self.snapshot(&zones, points, now);

        TickReport {
            tag_updates,
            intrusion_events,
            removed_points: update.removed,
            snapshot,
        }
    }

    fn snapshot(&self, zones: &AuraZoneIndex, points: Vec<PointView>, now: Timestamp) -> SceneSnapshot {
        let tags = self
            .tracker
            .tag_ids()
            .map(|tag_id| TagView {
                tag_id: tag_id.clone(),
                trail: self.tracker.trail(tag_id).cloned().collect(),
                current: self.tracker.current_position(tag_id),
                aura: zones.zone(tag_id).copied(),
            })
            .collect();

        SceneSnapshot {
            timestamp: now,
            region: *self.detector.region(),
            tags,
            points,
            intrusion: self.detector.status(),
            metrics: self.metrics.snapshot(),
        }
    }
}
