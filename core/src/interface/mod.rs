pub mod inbound;
pub mod outbound;

pub use inbound::{
    AzimuthReading, InboundEvent, InterfaceError, RadarMount, RadarPointBatch, Station, TagId,
};
pub use outbound::{
    Classification, IntrusionEvent, IntrusionKind, IntrusionStatus, PointRemoved, PointView,
    SceneSnapshot, TagPositionUpdate, TagView, TickReport, TrailEntry,
};
