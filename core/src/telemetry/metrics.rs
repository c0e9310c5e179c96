use crate::interface::IntrusionKind;
use crate::prelude::FusionError;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

/// Counter values at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MetricsSnapshot {
    pub ticks: u64,
    pub events_drained: u64,
    pub fixes: u64,
    pub missing_data: u64,
    pub stale_data: u64,
    pub parallel_bearings: u64,
    pub points_evicted: u64,
    pub intrusions_flagged: u64,
    pub intrusions_cleared: u64,
    pub objects_left: u64,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    fn update(&self, apply: impl FnOnce(&mut MetricsSnapshot)) {
        if let Ok(mut metrics) = self.inner.lock() {
            apply(&mut metrics);
        }
    }

    pub fn record_tick(&self, drained: usize) {
        self.update(|m| {
            m.ticks += 1;
            m.events_drained += drained as u64;
        });
    }

    pub fn record_fix(&self) {
        self.update(|m| m.fixes += 1);
    }

    pub fn record_rejection(&self, reason: FusionError) {
        self.update(|m| match reason {
            FusionError::MissingData => m.missing_data += 1,
            FusionError::StaleData => m.stale_data += 1,
            FusionError::ParallelBearings => m.parallel_bearings += 1,
        });
    }

    pub fn record_evictions(&self, count: usize) {
        self.update(|m| m.points_evicted += count as u64);
    }

    pub fn record_intrusion(&self, kind: IntrusionKind) {
        self.update(|m| match kind {
            IntrusionKind::Flagged => m.intrusions_flagged += 1,
            IntrusionKind::Cleared => m.intrusions_cleared += 1,
            IntrusionKind::ObjectLeft => m.objects_left += 1,
        });
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner.lock().map(|m| *m).unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
