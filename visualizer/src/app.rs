use crate::canvas::RadarCanvas;
use iced::{
    time,
    widget::{Canvas, Container},
    Element, Length, Subscription, Task, Theme,
};
use radarcore::config::DisplayConfig;
use radarcore::prelude::{DecoderMetrics, RadarRenderer, RadarState, TrailBuffer};
use std::sync::Arc;
use std::time::Duration;

/// Handles the window needs; cloned into the application on boot.
#[derive(Clone)]
pub struct AppContext {
    pub state: Arc<RadarState>,
    pub metrics: Arc<DecoderMetrics>,
    pub display: DisplayConfig,
    pub tick: Duration,
    pub title: String,
}

pub struct Visualizer {
    context: AppContext,
    renderer: RadarRenderer,
    trail: TrailBuffer,
}

#[derive(Debug, Clone)]
pub enum Message {
    Tick,
}

impl Visualizer {
    pub fn boot(context: AppContext) -> (Self, Task<Message>) {
        let renderer = RadarRenderer::new(&context.display);
        let mut visualizer = Visualizer {
            context,
            renderer,
            trail: TrailBuffer::new(),
        };
        visualizer.advance();
        (visualizer, Task::none())
    }

    pub fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => {
                state.advance();
                Task::none()
            }
        }
    }

    pub fn view(state: &Self) -> Element<'_, Message> {
        let radar = Canvas::new(RadarCanvas {
            trail: &state.trail,
            surface: state.renderer.surface(),
        })
        .width(Length::Fill)
        .height(Length::Fill);

        Container::new(radar)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    pub fn title(state: &Self) -> String {
        state.context.title.clone()
    }

    pub fn subscription(state: &Self) -> Subscription<Message> {
        time::every(state.context.tick).map(|_| Message::Tick)
    }

    pub fn theme(_: &Self) -> Theme {
        Theme::Dark
    }

    /// One render tick: snapshot, draw, fade the previous frames.
    fn advance(&mut self) {
        let snapshot = self.context.state.read();
        let stats = self.context.metrics.snapshot();
        let frame = self.renderer.render_with_stats(&snapshot, Some(stats));
        self.trail.composite(frame);
    }

    #[cfg(test)]
    fn trail_depth(&self) -> usize {
        self.trail.depth()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use radarcore::prelude::Reading;

    fn context() -> AppContext {
        AppContext {
            state: Arc::new(RadarState::new(40)),
            metrics: Arc::new(DecoderMetrics::new()),
            display: DisplayConfig::default(),
            tick: Duration::from_millis(50),
            title: "test".into(),
        }
    }

    #[test]
    fn ticks_build_up_a_bounded_trail() {
        let ctx = context();
        let (mut visualizer, _) = Visualizer::boot(ctx.clone());
        assert_eq!(visualizer.trail_depth(), 1);

        for angle in 0..30 {
            ctx.state.write(Reading::new(angle, 20));
            let _ = Visualizer::update(&mut visualizer, Message::Tick);
        }
        assert!(visualizer.trail_depth() > 1);
        assert!(visualizer.trail_depth() <= 8);
    }
}
