use aurafuse::interface::{IntrusionEvent, SceneSnapshot, TickReport};
use serde::{Deserialize, Serialize};

/// Most recent intrusion events kept for `/events`.
pub const EVENT_HISTORY: usize = 64;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VisualizationModel {
    pub snapshot: Option<SceneSnapshot>,
    pub recent_events: Vec<IntrusionEvent>,
    pub removed_points: usize,
}

impl VisualizationModel {
    pub fn apply(&mut self, report: &TickReport) {
        self.snapshot = Some(report.snapshot.clone());
        self.removed_points += report.removed_points.len();
        self.recent_events
            .extend(report.intrusion_events.iter().cloned());
        if self.recent_events.len() > EVENT_HISTORY {
            let excess = self.recent_events.len() - EVENT_HISTORY;
            self.recent_events.drain(..excess);
        }
    }
}
