use crate::render::scene::{DrawCommand, FadeOverlay, RenderedFrame, Surface};
use std::collections::VecDeque;

/// Opacity below which a faded layer is dropped.
pub const DEFAULT_VISIBILITY_FLOOR: f32 = 0.05;

struct TrailLayer {
    commands: Vec<DrawCommand>,
    opacity: f32,
}

/// Stands in for a persistent drawing surface on backends that repaint
/// from scratch.
///
/// Each composite applies the frame's overlay to every retained sweep layer
/// (opacity scaled by `1 - alpha`) and then adds the new sweep on top, which
/// is what repeatedly filling a real surface with a translucent rectangle
/// does to old pixels.
pub struct TrailBuffer {
    layers: VecDeque<TrailLayer>,
    floor: f32,
    overlay: Option<FadeOverlay>,
    grid: Vec<DrawCommand>,
    hud: Vec<DrawCommand>,
}

impl TrailBuffer {
    pub fn new() -> Self {
        Self::with_floor(DEFAULT_VISIBILITY_FLOOR)
    }

    pub fn with_floor(floor: f32) -> Self {
        Self {
            layers: VecDeque::new(),
            floor: floor.clamp(f32::EPSILON, 1.0),
            overlay: None,
            grid: Vec::new(),
            hud: Vec::new(),
        }
    }

    pub fn composite(&mut self, frame: RenderedFrame) {
        let keep = (1.0 - frame.overlay.alpha).clamp(0.0, 1.0);
        for layer in self.layers.iter_mut() {
            layer.opacity *= keep;
        }
        let floor = self.floor;
        self.layers.retain(|layer| layer.opacity >= floor);
        self.layers.push_back(TrailLayer {
            commands: frame.sweep,
            opacity: 1.0,
        });

        self.overlay = Some(frame.overlay);
        self.grid = frame.grid;
        self.hud = frame.hud;
    }

    /// Number of sweep layers still visible, newest included.
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    /// Layer opacities, oldest first.
    pub fn opacities(&self) -> impl Iterator<Item = f32> + '_ {
        self.layers.iter().map(|layer| layer.opacity)
    }

    pub fn overlay(&self) -> Option<FadeOverlay> {
        self.overlay
    }

    /// Paints grid, then the trail from oldest to newest, then the HUD.
    pub fn paint<S: Surface>(&self, surface: &mut S) {
        for command in &self.grid {
            surface.draw(command, 1.0);
        }
        for layer in &self.layers {
            for command in &layer.commands {
                surface.draw(command, layer.opacity);
            }
        }
        for command in &self.hud {
            surface.draw(command, 1.0);
        }
    }
}

impl Default for TrailBuffer {
    fn default() -> Self {
        Self::new()
    }
}
