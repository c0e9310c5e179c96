use crate::prelude::{Position, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Problems constructing an inbound event value.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("tag id must be 12 hex digits, got {0:?}")]
    InvalidTagId(String),
    #[error("station must be 1 or 2, got {0}")]
    InvalidStation(u8),
}

/// 12-hex-digit identifier reported by the bearing stations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagId(String);

impl TagId {
    pub fn parse(raw: &str) -> Result<Self, InterfaceError> {
        if raw.len() == 12 && raw.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(Self(raw.to_ascii_uppercase()))
        } else {
            Err(InterfaceError::InvalidTagId(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TagId {
    type Error = InterfaceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TagId> for String {
    fn from(id: TagId) -> Self {
        id.0
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One of the two fixed bearing anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Station {
    One,
    Two,
}

impl TryFrom<u8> for Station {
    type Error = InterfaceError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Station::One),
            2 => Ok(Station::Two),
            other => Err(InterfaceError::InvalidStation(other)),
        }
    }
}

impl From<Station> for u8 {
    fn from(station: Station) -> Self {
        match station {
            Station::One => 1,
            Station::Two => 2,
        }
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "station {}", u8::from(*self))
    }
}

/// Decoded bearing message, raw clockwise-from-north azimuth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AzimuthReading {
    pub tag_id: TagId,
    pub station: Station,
    pub raw_azimuth_deg: i32,
    pub timestamp: Timestamp,
}

/// Decoded ranging frame, already in the anchor frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RadarPointBatch {
    pub points: Vec<Position>,
}

/// Everything a producer lane may enqueue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    Azimuth(AzimuthReading),
    Radar(RadarPointBatch),
}

impl From<AzimuthReading> for InboundEvent {
    fn from(reading: AzimuthReading) -> Self {
        InboundEvent::Azimuth(reading)
    }
}

impl From<RadarPointBatch> for InboundEvent {
    fn from(batch: RadarPointBatch) -> Self {
        InboundEvent::Radar(batch)
    }
}

/// Placement of the ranging sensor in the anchor frame. Detections arrive
/// sensor-relative and are mirrored and scaled into the shared frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadarMount {
    pub center: Position,
    pub scale: f64,
}

impl Default for RadarMount {
    fn default() -> Self {
        Self {
            center: Position::new(5.0, 0.0),
            scale: 10.0,
        }
    }
}

impl RadarMount {
    pub fn to_anchor_frame(&self, x: f64, y: f64) -> Position {
        Position::new(self.center.x - x * self.scale, self.center.y - y * self.scale)
    }

    /// Inverse mapping, for generators that start from anchor-frame truth.
    pub fn to_sensor_frame(&self, point: &Position) -> (f64, f64) {
        (
            (self.center.x - point.x) / self.scale,
            (self.center.y - point.y) / self.scale,
        )
    }

    pub fn batch_from_detections(&self, xs: &[f64], ys: &[f64]) -> RadarPointBatch {
        RadarPointBatch {
            points: xs
                .iter()
                .zip(ys)
                .map(|(&x, &y)| self.to_anchor_frame(x, y))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_id_requires_twelve_hex_digits() {
        assert_eq!(TagId::parse("ccf9578e0d8a").unwrap().as_str(), "CCF9578E0D8A");
        assert!(TagId::parse("CCF9578E0D8").is_err());
        assert!(TagId::parse("CCF9578E0D8G").is_err());
    }

    #[test]
    fn station_serializes_as_number() {
        let json = serde_json::to_string(&Station::Two).unwrap();
        assert_eq!(json, "2");
        assert!(serde_json::from_str::<Station>("3").is_err());
    }

    #[test]
    fn inbound_event_is_tagged_json() {
        let event: InboundEvent = AzimuthReading {
            tag_id: TagId::parse("CCF9578E0D8A").unwrap(),
            station: Station::One,
            raw_azimuth_deg: -12,
            timestamp: 1.5,
        }
        .into();
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "azimuth");
        assert_eq!(json["station"], 1);
        assert_eq!(json["tag_id"], "CCF9578E0D8A");
    }

    #[test]
    fn radar_mount_mirrors_and_scales() {
        let mount = RadarMount::default();
        let batch = mount.batch_from_detections(&[0.1, -0.2], &[1.5, 0.0]);
        assert_eq!(batch.points[0], Position::new(4.0, -15.0));
        assert_eq!(batch.points[1], Position::new(7.0, 0.0));
        let (x, y) = mount.to_sensor_frame(&Position::new(4.0, -15.0));
        assert!((x - 0.1).abs() < 1e-12 && (y - 1.5).abs() < 1e-12);
    }
}
