use serde::Serialize;

pub const MAX_ANGLE_DEG: u16 = 180;

/// One validated sensor sample. Always satisfies `angle <= 180`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Reading {
    angle: u16,
    distance: u32,
}

impl Reading {
    pub fn new(angle: u16, distance: u32) -> Self {
        Self {
            angle: angle.min(MAX_ANGLE_DEG),
            distance,
        }
    }

    /// Builds a reading from signed wire values, clamping both into range.
    pub fn from_raw(angle: i64, distance: i64) -> Self {
        Self::new(Self::clamp_angle(angle), Self::clamp_distance(distance))
    }

    pub fn clamp_angle(raw: i64) -> u16 {
        raw.clamp(0, i64::from(MAX_ANGLE_DEG)) as u16
    }

    pub fn clamp_distance(raw: i64) -> u32 {
        raw.clamp(0, i64::from(u32::MAX)) as u32
    }

    pub fn angle(&self) -> u16 {
        self.angle
    }

    pub fn distance(&self) -> u32 {
        self.distance
    }

    pub fn within_range(&self, max_range: u32) -> bool {
        self.distance <= max_range
    }
}
