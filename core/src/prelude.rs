use serde::{Deserialize, Serialize};

pub use crate::math::geometry::{AuraShape, ParkingRegion, Position};

/// Seconds since the Unix epoch (or since scenario start for replays).
pub type Timestamp = f64;

/// Shared configuration for every fusion stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    pub station1: Position,
    pub station2: Position,
    pub parking_region: ParkingRegion,
    /// Maximum skew between the two station readings used for one fix.
    pub time_threshold: f64,
    pub trail_duration: f64,
    pub persistence_duration: f64,
    pub proximity_threshold: f64,
    pub intruder_threshold: usize,
    pub illegal_persistence_duration: f64,
    pub aura: AuraShape,
    pub tick_period_ms: u64,
    pub retry_delay_ms: u64,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            station1: Position::new(0.0, 0.0),
            station2: Position::new(10.0, 0.0),
            parking_region: ParkingRegion::new(2.0, 4.0, -20.0, -10.0),
            time_threshold: 1.0,
            trail_duration: 3.0,
            persistence_duration: 2.0,
            proximity_threshold: 0.5,
            intruder_threshold: 20,
            illegal_persistence_duration: 10.0,
            aura: AuraShape {
                radius_x: 1.0,
                radius_y: 10.0,
            },
            tick_period_ms: 100,
            retry_delay_ms: 5_000,
        }
    }
}

impl FusionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let durations = [
            ("time_threshold", self.time_threshold),
            ("trail_duration", self.trail_duration),
            ("persistence_duration", self.persistence_duration),
            ("illegal_persistence_duration", self.illegal_persistence_duration),
        ];
        for (name, value) in durations {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidValue(format!(
                    "{} must be a positive number of seconds, got {}",
                    name, value
                )));
            }
        }

        if !(self.proximity_threshold.is_finite() && self.proximity_threshold >= 0.0) {
            return Err(ConfigError::InvalidValue(
                "proximity_threshold must be non-negative".into(),
            ));
        }
        if !(self.aura.radius_x > 0.0 && self.aura.radius_y > 0.0) {
            return Err(ConfigError::InvalidValue(
                "aura radii must be strictly positive".into(),
            ));
        }
        let region = &self.parking_region;
        if region.x_min > region.x_max || region.y_min > region.y_max {
            return Err(ConfigError::InvalidRegion(format!(
                "x [{}, {}] y [{}, {}]",
                region.x_min, region.x_max, region.y_min, region.y_max
            )));
        }
        if self.station1 == self.station2 {
            return Err(ConfigError::CoincidentAnchors);
        }
        if self.tick_period_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "tick_period_ms must be at least 1".into(),
            ));
        }
        if self.retry_delay_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "retry_delay_ms must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Non-fatal reasons a tag gets no position update this tick.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FusionError {
    #[error("missing reading from one or both stations")]
    MissingData,
    #[error("station readings too far apart in time")]
    StaleData,
    #[error("bearings are parallel, no intersection")]
    ParallelBearings,
}

pub type FusionResult<T> = Result<T, FusionError>;

/// Rejected configuration values.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid value: {0}")]
    InvalidValue(String),
    #[error("inverted parking region bounds: {0}")]
    InvalidRegion(String),
    #[error("station anchors must not coincide")]
    CoincidentAnchors,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(FusionConfig::default().validate().is_ok());
    }

    #[test]
    fn inverted_region_is_rejected() {
        let config = FusionConfig {
            parking_region: ParkingRegion::new(4.0, 2.0, -20.0, -10.0),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRegion(_))
        ));
    }

    #[test]
    fn coincident_anchors_are_rejected() {
        let config = FusionConfig {
            station2: Position::new(0.0, 0.0),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::CoincidentAnchors));
    }

    #[test]
    fn zero_aura_radius_is_rejected() {
        let mut config = FusionConfig::default();
        config.aura.radius_x = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_durations_are_rejected() {
        let zeroed: [fn(&mut FusionConfig); 4] = [
            |c| c.time_threshold = 0.0,
            |c| c.trail_duration = 0.0,
            |c| c.persistence_duration = 0.0,
            |c| c.illegal_persistence_duration = 0.0,
        ];
        for zero in zeroed {
            let mut config = FusionConfig::default();
            zero(&mut config);
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidValue(_))
            ));
        }
    }

    #[test]
    fn zero_retry_delay_is_rejected() {
        let config = FusionConfig {
            retry_delay_ms: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue(_))
        ));
    }
}
