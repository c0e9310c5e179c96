//! Fusion core for the AoA + radar parking monitor.
//!
//! Two bearing stations locate tagged objects by triangulation; a ranging
//! sensor's point cloud is split into tagged and untagged points by the
//! ellipses drawn around each tag; untagged points that pile up inside the
//! parking region raise an intrusion alert. Producer lanes feed immutable
//! events into one queue and the fusion loop owns every table.

pub mod interface;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod runtime;
pub mod telemetry;

pub use prelude::{FusionConfig, FusionError, FusionResult, Position};
pub use processing::FusionEngine;
