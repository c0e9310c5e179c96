pub mod aura;
pub mod engine;
pub mod history;
pub mod intrusion;
pub mod trail;
pub mod triangulation;

pub use aura::{AuraZoneIndex, PointClassifier};
pub use engine::FusionEngine;
pub use history::{HistoryUpdate, PointHistory, PointKey, PointRecord};
pub use intrusion::{AlertState, DepartureWatch, IntrusionDetector};
pub use trail::TagTracker;
pub use triangulation::{BearingSample, StationPair, Triangulator};
