use crate::app::Message;
use iced::{
    alignment, mouse,
    widget::canvas::{self, path, Frame, Geometry, Path, Stroke},
    Color, Point, Radians, Rectangle, Renderer, Size, Theme, Vector,
};
use radarcore::config::SurfaceSize;
use radarcore::math::ScreenPoint;
use radarcore::render::{Anchor, DrawCommand, Ink, Surface, TrailBuffer};

const BACKGROUND: Color = Color::from_rgb(0.0, 0.02, 0.0);
const HUD_PANEL: Color = Color::from_rgb(0.0, 0.0, 0.0);

fn ink_color(ink: Ink) -> Color {
    match ink {
        Ink::Grid => Color::from_rgb8(98, 245, 31),
        Ink::Label => Color::from_rgb8(98, 245, 60),
        Ink::Sweep => Color::from_rgb8(30, 250, 60),
        Ink::Detection => Color::from_rgb8(255, 10, 10),
        Ink::Hud => Color::from_rgb8(235, 235, 235),
        Ink::Alert => Color::from_rgb8(255, 90, 40),
    }
}

fn point(screen: ScreenPoint) -> Point {
    Point::new(screen.x, screen.y)
}

/// Largest uniform scale that fits `surface` inside `bounds`, and the offset
/// that centres it. Rings stay circular whatever the window shape.
fn letterbox(bounds: Size, surface: SurfaceSize) -> (Vector, f32) {
    let width = surface.width_px();
    let height = surface.height_px();
    let scale = (bounds.width / width).min(bounds.height / height);
    let offset = Vector::new(
        (bounds.width - width * scale) / 2.0,
        (bounds.height - height * scale) / 2.0,
    );
    (offset, scale)
}

/// Paints the trail buffer, scaled uniformly from the configured surface to
/// the widget bounds.
pub struct RadarCanvas<'a> {
    pub trail: &'a TrailBuffer,
    pub surface: SurfaceSize,
}

impl canvas::Program<Message> for RadarCanvas<'_> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), BACKGROUND);

        let surface_width = self.surface.width_px();
        let surface_height = self.surface.height_px();
        let (offset, scale) = letterbox(bounds.size(), self.surface);
        frame.with_save(|frame| {
            frame.translate(offset);
            frame.scale(scale);
            if let Some(overlay) = self.trail.overlay() {
                let hud_top = overlay.rect.y + overlay.rect.height;
                frame.fill_rectangle(
                    Point::new(0.0, hud_top),
                    Size::new(surface_width, surface_height - hud_top),
                    HUD_PANEL,
                );
            }
            self.trail.paint(&mut FrameSurface { frame });
        });

        vec![frame.into_geometry()]
    }
}

struct FrameSurface<'a> {
    frame: &'a mut Frame,
}

impl Surface for FrameSurface<'_> {
    fn draw(&mut self, command: &DrawCommand, opacity: f32) {
        let base = ink_color(command.ink());
        let color = Color {
            a: base.a * opacity,
            ..base
        };

        match command {
            DrawCommand::Arc {
                center,
                radius,
                start,
                end,
                width,
                ..
            } => {
                let arc = Path::new(|builder| {
                    builder.arc(path::Arc {
                        center: point(*center),
                        radius: *radius,
                        start_angle: Radians(*start),
                        end_angle: Radians(*end),
                    })
                });
                self.frame.stroke(
                    &arc,
                    Stroke::default().with_color(color).with_width(*width),
                );
            }
            DrawCommand::Line {
                from, to, width, ..
            } => {
                let line = Path::line(point(*from), point(*to));
                self.frame.stroke(
                    &line,
                    Stroke::default().with_color(color).with_width(*width),
                );
            }
            DrawCommand::Text {
                position,
                content,
                size,
                rotation,
                anchor,
                ..
            } => {
                let (align_x, align_y) = match anchor {
                    Anchor::BottomLeft => {
                        (alignment::Horizontal::Left, alignment::Vertical::Bottom)
                    }
                    Anchor::BottomRight => {
                        (alignment::Horizontal::Right, alignment::Vertical::Bottom)
                    }
                    Anchor::Center => (alignment::Horizontal::Center, alignment::Vertical::Center),
                };
                self.frame.with_save(|frame| {
                    frame.translate(Vector::new(position.x, position.y));
                    frame.rotate(*rotation);
                    frame.fill_text(canvas::Text {
                        content: content.clone(),
                        position: Point::ORIGIN,
                        color,
                        size: (*size).into(),
                        align_x: align_x.into(),
                        align_y,
                        ..canvas::Text::default()
                    });
                });
            }
        }
    }
}
