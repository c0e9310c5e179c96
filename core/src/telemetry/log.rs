use crate::interface::{IntrusionEvent, IntrusionKind, TagId};
use crate::prelude::{FusionError, Position};
use log::{debug, info, warn};

/// Single place the fusion stages send their log lines through.
pub struct LogManager {
    target: &'static str,
}

impl LogManager {
    pub fn new(target: &'static str) -> Self {
        Self { target }
    }

    pub fn record(&self, message: &str) {
        info!(target: self.target, "{}", message);
    }

    pub fn detail(&self, message: &str) {
        debug!(target: self.target, "{}", message);
    }

    pub fn rejected_fix(&self, tag_id: &TagId, reason: FusionError) {
        debug!(target: self.target, "no fix for tag {}: {}", tag_id, reason);
    }

    pub fn fix(&self, tag_id: &TagId, position: &Position) {
        debug!(
            target: self.target,
            "tag {} at ({:.2}, {:.2})", tag_id, position.x, position.y
        );
    }

    pub fn intrusion(&self, event: &IntrusionEvent) {
        let point = event
            .relevant_point
            .map(|p| format!(" at ({:.1}, {:.1})", p.x, p.y))
            .unwrap_or_default();
        match event.kind {
            IntrusionKind::Flagged => {
                warn!(target: self.target, "intruder detected in parking region{}", point)
            }
            IntrusionKind::Cleared => info!(
                target: self.target,
                "tagged vehicle inside parking region, intrusion cleared{}", point
            ),
            IntrusionKind::ObjectLeft => {
                info!(target: self.target, "object left the parking region{}", point)
            }
        }
    }

    pub fn transport_failure(&self, lane: &str, error: &dyn std::fmt::Display, retry_ms: u64) {
        warn!(
            target: self.target,
            "lane {}: {}. Retrying in {} ms", lane, error, retry_ms
        );
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new("aurafuse")
    }
}
