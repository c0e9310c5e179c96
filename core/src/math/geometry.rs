use serde::{Deserialize, Serialize};

/// Point in the anchor frame, metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Axis-aligned monitored rectangle, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParkingRegion {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl ParkingRegion {
    pub const fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    pub fn contains(&self, point: &Position) -> bool {
        (self.x_min..=self.x_max).contains(&point.x) && (self.y_min..=self.y_max).contains(&point.y)
    }

    pub fn center(&self) -> Position {
        Position::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }
}

/// Fixed ellipse radii applied around every tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AuraShape {
    pub radius_x: f64,
    pub radius_y: f64,
}

/// Ellipse centred on a tag's latest position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub center: Position,
    pub radius_x: f64,
    pub radius_y: f64,
}

impl Ellipse {
    pub fn around(center: Position, shape: AuraShape) -> Self {
        Self {
            center,
            radius_x: shape.radius_x,
            radius_y: shape.radius_y,
        }
    }

    pub fn contains(&self, point: &Position) -> bool {
        let dx = (point.x - self.center.x) / self.radius_x;
        let dy = (point.y - self.center.y) / self.radius_y;
        dx * dx + dy * dy <= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_bounds_are_inclusive() {
        let region = ParkingRegion::new(2.0, 4.0, -20.0, -10.0);
        assert!(region.contains(&Position::new(2.0, -20.0)));
        assert!(region.contains(&Position::new(4.0, -10.0)));
        assert!(region.contains(&Position::new(3.0, -15.0)));
        assert!(!region.contains(&Position::new(4.01, -15.0)));
        assert!(!region.contains(&Position::new(3.0, -9.9)));
        assert_eq!(region.center(), Position::new(3.0, -15.0));
    }

    #[test]
    fn ellipse_uses_normalized_test() {
        let ellipse = Ellipse::around(
            Position::new(5.0, -15.0),
            AuraShape {
                radius_x: 1.0,
                radius_y: 10.0,
            },
        );
        assert!(ellipse.contains(&Position::new(5.0, -15.0)));
        assert!(ellipse.contains(&Position::new(6.0, -15.0)));
        assert!(ellipse.contains(&Position::new(5.0, -5.0)));
        assert!(!ellipse.contains(&Position::new(6.1, -15.0)));
        assert!(!ellipse.contains(&Position::new(5.8, -9.0)));
    }
}
