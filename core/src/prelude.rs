pub use crate::config::{DisplayConfig, Layout, SurfaceSize};
pub use crate::protocol::{FrameDecoder, Reading};
pub use crate::render::{DrawCommand, FadeOverlay, Ink, RadarRenderer, RenderedFrame, TrailBuffer};
pub use crate::state::{LinkStatus, RadarState, Snapshot};
pub use crate::telemetry::{DecoderMetrics, DecoderStats};

/// Errors raised while validating the display configuration.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("max range must be positive")]
    ZeroRange,
    #[error("surface must be at least 1x1, got {width}x{height}")]
    EmptySurface { width: u32, height: u32 },
    #[error("trail fade {0} outside (0, 1]")]
    TrailFade(f32),
    #[error("invalid layout: {0}")]
    Layout(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
