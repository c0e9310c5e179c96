pub mod clock;
pub mod fusion_loop;
pub mod lane;
pub mod signal;

pub use clock::{Clock, SystemClock};
pub use fusion_loop::FusionLoop;
pub use lane::{run_lane, spawn_lane, EventSource, LaneSettings, LaneStats, TransportError};
pub use signal::StopSignal;
