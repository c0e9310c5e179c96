use crate::interface::inbound::TagId;
use crate::math::geometry::Ellipse;
use crate::prelude::{ParkingRegion, Position, Timestamp};
use crate::telemetry::metrics::MetricsSnapshot;
use serde::{Deserialize, Serialize};

/// Whether a ranging point falls inside some tag's aura.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Tagged,
    Untagged,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagPositionUpdate {
    pub tag_id: TagId,
    pub position: Position,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntrusionKind {
    Flagged,
    Cleared,
    ObjectLeft,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntrusionEvent {
    pub kind: IntrusionKind,
    pub region: ParkingRegion,
    pub timestamp: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevant_point: Option<Position>,
}

/// Renderer cleanup notice for an evicted point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointRemoved {
    pub point: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailEntry {
    pub timestamp: Timestamp,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagView {
    pub tag_id: TagId,
    pub trail: Vec<TrailEntry>,
    pub current: Option<Position>,
    pub aura: Option<Ellipse>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointView {
    pub position: Position,
    pub classification: Classification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct IntrusionStatus {
    pub flagged: bool,
    pub unique_untagged: usize,
}

/// Full state published once per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub timestamp: Timestamp,
    pub region: ParkingRegion,
    pub tags: Vec<TagView>,
    pub points: Vec<PointView>,
    pub intrusion: IntrusionStatus,
    pub metrics: MetricsSnapshot,
}

/// Everything one tick produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub tag_updates: Vec<TagPositionUpdate>,
    pub intrusion_events: Vec<IntrusionEvent>,
    pub removed_points: Vec<PointRemoved>,
    pub snapshot: SceneSnapshot,
}
