//! Core of the sweep radar display.
//!
//! Bytes from the sensor channel go through the [`protocol::FrameDecoder`],
//! land in the shared [`state::RadarState`], and are turned into draw
//! primitives by the [`render::RadarRenderer`] once per display tick.

pub mod config;
pub mod ingest;
pub mod math;
pub mod prelude;
pub mod protocol;
pub mod render;
pub mod state;
pub mod telemetry;

pub use prelude::{ConfigError, Reading, RadarState, Snapshot};
