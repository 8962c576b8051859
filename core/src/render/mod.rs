//! Turns a [`Snapshot`](crate::state::Snapshot) into draw primitives.

pub mod renderer;
pub mod scene;
pub mod trail;

pub use renderer::RadarRenderer;
pub use scene::{Anchor, DrawCommand, FadeOverlay, Ink, RenderedFrame, ScreenRect, Surface};
pub use trail::TrailBuffer;
