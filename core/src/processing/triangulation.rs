use crate::interface::{AzimuthReading, Station, TagId};
use crate::math::angle::to_math_angle;
use crate::math::matrix::Matrix2;
use crate::prelude::{FusionConfig, FusionError, FusionResult, Position, Timestamp};
use std::collections::HashMap;

/// Normalized bearing from one station.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BearingSample {
    pub math_angle_deg: f64,
    pub timestamp: Timestamp,
}

/// Latest reading per station for one tag. No history is kept.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StationPair {
    pub station1: Option<BearingSample>,
    pub station2: Option<BearingSample>,
}

impl StationPair {
    fn slot_mut(&mut self, station: Station) -> &mut Option<BearingSample> {
        match station {
            Station::One => &mut self.station1,
            Station::Two => &mut self.station2,
        }
    }
}

/// Two-anchor AoA intersection.
pub struct Triangulator {
    anchor1: Position,
    anchor2: Position,
    time_threshold: f64,
    pairs: HashMap<TagId, StationPair>,
}

impl Triangulator {
    pub fn new(config: &FusionConfig) -> Self {
        Self {
            anchor1: config.station1,
            anchor2: config.station2,
            time_threshold: config.time_threshold,
            pairs: HashMap::new(),
        }
    }

    pub fn record(&mut self, reading: &AzimuthReading) {
        self.record_azimuth(
            &reading.tag_id,
            reading.station,
            reading.raw_azimuth_deg,
            reading.timestamp,
        );
    }

    /// Overwrites the station's entry for the tag. Any integer is accepted;
    /// the angle is only wrapped.
    pub fn record_azimuth(
        &mut self,
        tag_id: &TagId,
        station: Station,
        raw_azimuth_deg: i32,
        timestamp: Timestamp,
    ) {
        let sample = BearingSample {
            math_angle_deg: to_math_angle(raw_azimuth_deg),
            timestamp,
        };
        let pair = self.pairs.entry(tag_id.clone()).or_default();
        *pair.slot_mut(station) = Some(sample);
    }

    pub fn station_pair(&self, tag_id: &TagId) -> Option<&StationPair> {
        self.pairs.get(tag_id)
    }

    /// Intersects the two bearing rays and resolves the point along
    /// station 1's ray.
    pub fn triangulate(&self, tag_id: &TagId) -> FusionResult<Position> {
        let pair = self.pairs.get(tag_id).ok_or(FusionError::MissingData)?;
        let (first, second) = match (pair.station1, pair.station2) {
            (Some(first), Some(second)) => (first, second),
            _ => return Err(FusionError::MissingData),
        };

        if (first.timestamp - second.timestamp).abs() > self.time_threshold {
            return Err(FusionError::StaleData);
        }

        let theta1 = first.math_angle_deg.to_radians();
        let theta2 = second.math_angle_deg.to_radians();
        let system = Matrix2::from_columns(
            (theta1.cos(), theta1.sin()),
            (-theta2.cos(), -theta2.sin()),
        );
        let offset = (
            self.anchor2.x - self.anchor1.x,
            self.anchor2.y - self.anchor1.y,
        );
        let (t1, _) = system
            .solve(offset)
            .ok_or(FusionError::ParallelBearings)?;

        Ok(Position::new(
            self.anchor1.x + t1 * theta1.cos(),
            self.anchor1.y + t1 * theta1.sin(),
        ))
    }
}
