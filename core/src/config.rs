use crate::prelude::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_MAX_RANGE_CM: u32 = 40;
pub const DEFAULT_TRAIL_FADE: f32 = 0.35;
pub const DEFAULT_STALE_AFTER_MS: u64 = 1000;

/// Pixel dimensions of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn width_px(&self) -> f32 {
        self.width as f32
    }

    pub fn height_px(&self) -> f32 {
        self.height as f32
    }
}

impl Default for SurfaceSize {
    fn default() -> Self {
        Self::new(1200, 700)
    }
}

/// Screen proportions of the radar geometry.
///
/// Radii and horizontal positions are fractions of the surface width,
/// vertical positions and the sweep radius are fractions of its height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub origin_x: f32,
    pub origin_y: f32,
    pub sweep_radius: f32,
    pub ring_radii: [f32; 4],
    pub marker_edge: f32,
    pub spoke_radius: f32,
    pub label_radius: f32,
    pub hud_strip: f32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            origin_x: 0.5,
            origin_y: 0.926,
            sweep_radius: 0.88,
            ring_radii: [0.15625, 0.2605, 0.36459, 0.46875],
            marker_edge: 0.495,
            spoke_radius: 0.5,
            label_radius: 0.48,
            hud_strip: 0.065,
        }
    }
}

impl Layout {
    pub fn validate(&self) -> ConfigResult<()> {
        let fractions = [
            ("origin_x", self.origin_x),
            ("origin_y", self.origin_y),
            ("sweep_radius", self.sweep_radius),
            ("marker_edge", self.marker_edge),
            ("spoke_radius", self.spoke_radius),
            ("label_radius", self.label_radius),
            ("hud_strip", self.hud_strip),
        ];
        for (name, value) in fractions {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Layout(format!("{name} must be positive")));
            }
        }
        if self.hud_strip >= 1.0 {
            return Err(ConfigError::Layout("hud_strip must be below 1".into()));
        }
        let rings_increase = self.ring_radii[0] > 0.0
            && self.ring_radii.windows(2).all(|pair| pair[0] < pair[1]);
        if !rings_increase {
            return Err(ConfigError::Layout(
                "ring_radii must be positive and strictly increasing".into(),
            ));
        }
        if self.marker_edge < self.outer_ring() {
            return Err(ConfigError::Layout(
                "marker_edge must not sit inside the outer ring".into(),
            ));
        }
        Ok(())
    }

    pub fn outer_ring(&self) -> f32 {
        self.ring_radii[3]
    }
}

/// Everything the renderer and shared state need, fixed at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub max_range: u32,
    pub surface: SurfaceSize,
    pub layout: Layout,
    pub trail_fade: f32,
    pub stale_after_ms: u64,
    pub show_diagnostics: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_range: DEFAULT_MAX_RANGE_CM,
            surface: SurfaceSize::default(),
            layout: Layout::default(),
            trail_fade: DEFAULT_TRAIL_FADE,
            stale_after_ms: DEFAULT_STALE_AFTER_MS,
            show_diagnostics: false,
        }
    }
}

impl DisplayConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_range == 0 {
            return Err(ConfigError::ZeroRange);
        }
        if self.surface.width == 0 || self.surface.height == 0 {
            return Err(ConfigError::EmptySurface {
                width: self.surface.width,
                height: self.surface.height,
            });
        }
        if !(self.trail_fade > 0.0 && self.trail_fade <= 1.0) {
            return Err(ConfigError::TrailFade(self.trail_fade));
        }
        self.layout.validate()
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_millis(self.stale_after_ms)
    }
}
