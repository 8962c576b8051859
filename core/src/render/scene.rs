use crate::math::ScreenPoint;

/// Drawing role of a primitive; the display backend maps roles to colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ink {
    Grid,
    Label,
    Sweep,
    Detection,
    Hud,
    Alert,
}

/// Which point of the text box sits on `position`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    BottomLeft,
    BottomRight,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Arc between two screen angles in radians, measured clockwise from +x
    /// (screen space, `y` down), so `PI..2*PI` is the upper half.
    Arc {
        center: ScreenPoint,
        radius: f32,
        start: f32,
        end: f32,
        width: f32,
        ink: Ink,
    },
    Line {
        from: ScreenPoint,
        to: ScreenPoint,
        width: f32,
        ink: Ink,
    },
    Text {
        position: ScreenPoint,
        content: String,
        size: f32,
        /// Clockwise rotation in radians about `position`.
        rotation: f32,
        anchor: Anchor,
        ink: Ink,
    },
}

impl DrawCommand {
    pub fn ink(&self) -> Ink {
        match self {
            DrawCommand::Arc { ink, .. }
            | DrawCommand::Line { ink, .. }
            | DrawCommand::Text { ink, .. } => *ink,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            DrawCommand::Text { content, .. } => Some(content.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Low-opacity fill composited over the previous frame before new geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeOverlay {
    /// Everything above the HUD strip.
    pub rect: ScreenRect,
    pub alpha: f32,
}

/// Output of one render tick.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFrame {
    pub overlay: FadeOverlay,
    /// Rings, spokes and scale labels; identical every tick.
    pub grid: Vec<DrawCommand>,
    /// Sweep line and detection marker; these leave the trail.
    pub sweep: Vec<DrawCommand>,
    /// Fixed-position text, never faded.
    pub hud: Vec<DrawCommand>,
}

impl RenderedFrame {
    pub fn commands(&self) -> impl Iterator<Item = &DrawCommand> {
        self.grid.iter().chain(&self.sweep).chain(&self.hud)
    }

    pub fn hud_texts(&self) -> impl Iterator<Item = &str> {
        self.hud.iter().filter_map(DrawCommand::text)
    }
}

/// Backend that can rasterise primitives at a given opacity.
pub trait Surface {
    fn draw(&mut self, command: &DrawCommand, opacity: f32);
}
