use crate::config::{DisplayConfig, Layout, SurfaceSize};
use crate::math::{PolarHelper, ScreenPoint};
use crate::render::scene::{Anchor, DrawCommand, FadeOverlay, Ink, RenderedFrame, ScreenRect};
use crate::state::{LinkStatus, Snapshot};
use crate::telemetry::DecoderStats;
use std::f32::consts::PI;
use std::time::Duration;

const GRID_STROKE: f32 = 2.0;
const SWEEP_STROKE: f32 = 9.0;
const LABEL_GAP_PX: f32 = 4.0;
const SPOKE_STEP_DEG: u16 = 30;
const RING_COUNT: u32 = 4;

/// Text heights as fractions of the surface height.
const HUD_TEXT: f32 = 0.035;
const LABEL_TEXT: f32 = 0.026;
const ALERT_TEXT: f32 = 0.06;

/// Stateless polar-to-screen renderer for one surface size.
pub struct RadarRenderer {
    layout: Layout,
    surface: SurfaceSize,
    trail_fade: f32,
    stale_after: Duration,
    show_diagnostics: bool,
}

impl RadarRenderer {
    pub fn new(config: &DisplayConfig) -> Self {
        Self {
            layout: config.layout.clone(),
            surface: config.surface,
            trail_fade: config.trail_fade,
            stale_after: config.stale_after(),
            show_diagnostics: config.show_diagnostics,
        }
    }

    pub fn surface(&self) -> SurfaceSize {
        self.surface
    }

    pub fn origin(&self) -> ScreenPoint {
        ScreenPoint::new(
            self.layout.origin_x * self.width(),
            self.layout.origin_y * self.height(),
        )
    }

    pub fn sweep_radius(&self) -> f32 {
        self.layout.sweep_radius * self.height()
    }

    /// Pixel radius that the snapshot's `max_range` maps onto: the outer ring.
    pub fn detect_radius(&self) -> f32 {
        self.layout.outer_ring() * self.width()
    }

    pub fn ring_radii(&self) -> [f32; 4] {
        self.layout.ring_radii.map(|fraction| fraction * self.width())
    }

    /// Top edge of the HUD strip.
    pub fn hud_top(&self) -> f32 {
        self.height() * (1.0 - self.layout.hud_strip)
    }

    pub fn render(&self, snapshot: &Snapshot) -> RenderedFrame {
        self.render_with_stats(snapshot, None)
    }

    /// Like [`render`](Self::render), adding a counter line when diagnostics
    /// are enabled and `stats` is given.
    pub fn render_with_stats(
        &self,
        snapshot: &Snapshot,
        stats: Option<DecoderStats>,
    ) -> RenderedFrame {
        let mut grid = Vec::new();
        self.draw_rings(snapshot.max_range, &mut grid);
        self.draw_spokes(&mut grid);
        self.draw_angle_labels(&mut grid);

        let mut sweep = vec![self.sweep_line(snapshot.angle)];
        if let Some(marker) = self.detection_marker(snapshot) {
            sweep.push(marker);
        }

        let mut hud = self.hud(snapshot);
        if self.show_diagnostics {
            if let Some(stats) = stats {
                hud.push(self.diagnostics(&stats));
            }
        }

        RenderedFrame {
            overlay: self.overlay(),
            grid,
            sweep,
            hud,
        }
    }

    fn overlay(&self) -> FadeOverlay {
        FadeOverlay {
            rect: ScreenRect {
                x: 0.0,
                y: 0.0,
                width: self.width(),
                height: self.hud_top(),
            },
            alpha: self.trail_fade,
        }
    }

    fn draw_rings(&self, max_range: u32, out: &mut Vec<DrawCommand>) {
        let origin = self.origin();
        for (index, radius) in self.ring_radii().into_iter().enumerate() {
            out.push(DrawCommand::Arc {
                center: origin,
                radius,
                start: PI,
                end: 2.0 * PI,
                width: GRID_STROKE,
                ink: Ink::Grid,
            });

            let ring = index as u32 + 1;
            out.push(DrawCommand::Text {
                position: ScreenPoint::new(
                    origin.x + radius - LABEL_GAP_PX,
                    origin.y - LABEL_GAP_PX,
                ),
                content: format_range(max_range as f32 * ring as f32 / RING_COUNT as f32),
                size: self.height() * LABEL_TEXT,
                rotation: 0.0,
                anchor: Anchor::BottomRight,
                ink: Ink::Label,
            });
        }
    }

    fn draw_spokes(&self, out: &mut Vec<DrawCommand>) {
        let origin = self.origin();
        let radius = self.layout.spoke_radius * self.width();
        for angle in (0..=180u16).step_by(SPOKE_STEP_DEG as usize) {
            out.push(DrawCommand::Line {
                from: origin,
                to: PolarHelper::to_screen(origin, radius, f32::from(angle)),
                width: GRID_STROKE,
                ink: Ink::Grid,
            });
        }
    }

    fn draw_angle_labels(&self, out: &mut Vec<DrawCommand>) {
        let origin = self.origin();
        let radius = self.layout.label_radius * self.width();
        for degrees in (SPOKE_STEP_DEG..180).step_by(SPOKE_STEP_DEG as usize) {
            let angle = f32::from(degrees);
            out.push(DrawCommand::Text {
                position: PolarHelper::to_screen(origin, radius, angle),
                content: format!("{}°", degrees),
                size: self.height() * LABEL_TEXT,
                // Tangent to the rings: upright at 90°, leaning out towards the ends.
                rotation: (90.0 - angle).to_radians(),
                anchor: Anchor::Center,
                ink: Ink::Label,
            });
        }
    }

    fn sweep_line(&self, angle: u16) -> DrawCommand {
        let origin = self.origin();
        DrawCommand::Line {
            from: origin,
            to: PolarHelper::to_screen(origin, self.sweep_radius(), f32::from(angle)),
            width: SWEEP_STROKE,
            ink: Ink::Sweep,
        }
    }

    fn detection_marker(&self, snapshot: &Snapshot) -> Option<DrawCommand> {
        if !snapshot.in_range() {
            return None;
        }
        let origin = self.origin();
        let angle = f32::from(snapshot.angle);
        let mapped = PolarHelper::scale(
            snapshot.distance as f32,
            snapshot.max_range as f32,
            self.detect_radius(),
        );
        Some(DrawCommand::Line {
            from: PolarHelper::to_screen(origin, mapped, angle),
            to: PolarHelper::to_screen(origin, self.layout.marker_edge * self.width(), angle),
            width: SWEEP_STROKE,
            ink: Ink::Detection,
        })
    }

    fn hud(&self, snapshot: &Snapshot) -> Vec<DrawCommand> {
        let baseline = self.height() - self.height() * self.layout.hud_strip * 0.25;
        let size = self.height() * HUD_TEXT;
        let in_range = snapshot.in_range();

        let status = if in_range {
            "Object: In Range"
        } else {
            "Object: Out of Range"
        };
        let distance = if in_range {
            format!("Distance: {} cm", snapshot.distance)
        } else {
            "Distance: Out of Range".to_string()
        };

        let mut hud = vec![
            self.hud_text(0.04, baseline, status.to_string(), size),
            self.hud_text(0.5, baseline, format!("Angle: {}°", snapshot.angle), size),
            self.hud_text(0.72, baseline, distance, size),
        ];

        let alert = match snapshot.link {
            LinkStatus::Lost => Some("LINK LOST"),
            LinkStatus::Connected if snapshot.is_stale(self.stale_after) => Some("NO DATA"),
            LinkStatus::Connected => None,
        };
        if let Some(alert) = alert {
            hud.push(DrawCommand::Text {
                position: ScreenPoint::new(self.width() * 0.5, self.height() * 0.1),
                content: alert.to_string(),
                size: self.height() * ALERT_TEXT,
                rotation: 0.0,
                anchor: Anchor::Center,
                ink: Ink::Alert,
            });
        }
        hud
    }

    fn hud_text(&self, x_fraction: f32, baseline: f32, content: String, size: f32) -> DrawCommand {
        DrawCommand::Text {
            position: ScreenPoint::new(self.width() * x_fraction, baseline),
            content,
            size,
            rotation: 0.0,
            anchor: Anchor::BottomLeft,
            ink: Ink::Hud,
        }
    }

    fn diagnostics(&self, stats: &DecoderStats) -> DrawCommand {
        DrawCommand::Text {
            position: ScreenPoint::new(self.width() * 0.02, self.height() * 0.05),
            content: format!(
                "frames {} ok / {} dropped / {} patched",
                stats.accepted,
                stats.discarded(),
                stats.bad_angle + stats.bad_distance
            ),
            size: self.height() * LABEL_TEXT,
            rotation: 0.0,
            anchor: Anchor::BottomLeft,
            ink: Ink::Hud,
        }
    }

    fn width(&self) -> f32 {
        self.surface.width_px()
    }

    fn height(&self) -> f32 {
        self.surface.height_px()
    }
}

/// `10cm`, `7.5cm`, `1.25cm`.
fn format_range(centimetres: f32) -> String {
    let fixed = format!("{:.2}", centimetres);
    format!("{}cm", fixed.trim_end_matches('0').trim_end_matches('.'))
}
