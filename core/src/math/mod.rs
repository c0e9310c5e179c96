pub mod angle;
pub mod geometry;
pub mod matrix;

pub use angle::{to_math_angle, to_raw_azimuth};
pub use geometry::{AuraShape, Ellipse, ParkingRegion, Position};
pub use matrix::Matrix2;
