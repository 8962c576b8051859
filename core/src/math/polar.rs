use serde::{Deserialize, Serialize};

/// Point in surface pixels, `y` growing downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: ScreenPoint) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

pub struct PolarHelper;

impl PolarHelper {
    /// Point at `radius` from `origin` along `angle_deg`
    /// (0° to the right, counter-clockwise on screen).
    pub fn to_screen(origin: ScreenPoint, radius: f32, angle_deg: f32) -> ScreenPoint {
        let angle = angle_deg.to_radians();
        ScreenPoint::new(
            origin.x + radius * angle.cos(),
            origin.y - radius * angle.sin(),
        )
    }

    /// Screen angle in degrees of `point` as seen from `origin`.
    pub fn bearing_deg(origin: ScreenPoint, point: ScreenPoint) -> f32 {
        let degrees = (origin.y - point.y).atan2(point.x - origin.x).to_degrees();
        if degrees < 0.0 {
            degrees + 360.0
        } else {
            degrees
        }
    }

    /// Linear map of `value` from `[0, domain]` onto `[0, extent]`.
    pub fn scale(value: f32, domain: f32, extent: f32) -> f32 {
        if domain <= 0.0 {
            return 0.0;
        }
        value / domain * extent
    }
}
