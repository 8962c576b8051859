use anyhow::Context;
use app::{AppContext, Visualizer};
use channel::ChannelAddress;
use clap::Parser;
use config::{Overrides, VisualizerConfig};
use radarcore::ingest;
use radarcore::prelude::{DecoderMetrics, FrameDecoder, RadarState};
use std::path::PathBuf;
use std::sync::Arc;

mod app;
mod canvas;
mod channel;
mod config;

#[derive(Parser)]
#[command(author, version, about = "Live radar display for angle,distance sensor streams")]
struct Args {
    /// Load display settings from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Channel: serial device, tcp://host:port, file:PATH or - for stdin
    #[arg(long)]
    port: Option<String>,
    #[arg(long)]
    baud: Option<u32>,
    /// Maximum detection range in centimetres
    #[arg(long)]
    max_range: Option<u32>,
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
    /// Render tick in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,
    /// Show decoder counters on the display
    #[arg(long, default_value_t = false)]
    diagnostics: bool,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            port: self.port.clone(),
            baud: self.baud,
            tick_ms: self.tick_ms,
            max_range: self.max_range,
            width: self.width,
            height: self.height,
            diagnostics: self.diagnostics,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = if let Some(path) = &args.config {
        VisualizerConfig::load(path)?
    } else {
        VisualizerConfig::default()
    }
    .with_overrides(args.overrides());
    config.validate()?;

    let address = ChannelAddress::parse(&config.port)?;
    log::info!("opening {} at {} baud", address, config.baud);
    let source = address
        .open(config.baud)
        .with_context(|| format!("channel {} unavailable", address))?;

    let state = Arc::new(RadarState::new(config.display.max_range));
    let metrics = Arc::new(DecoderMetrics::new());
    let decoder = FrameDecoder::new().with_metrics(metrics.clone());
    ingest::spawn(&address.to_string(), source, decoder, state.clone())
        .context("starting ingest thread")?;

    let surface = config.display.surface;
    let context = AppContext {
        state,
        metrics,
        tick: config.tick(),
        title: format!("Radar - {}", address),
        display: config.display,
    };

    iced::application(
        move || Visualizer::boot(context.clone()),
        Visualizer::update,
        Visualizer::view,
    )
    .title(Visualizer::title)
    .subscription(Visualizer::subscription)
    .theme(Visualizer::theme)
    .window_size(iced::Size::new(
        surface.width_px(),
        surface.height_px(),
    ))
    .run()
    .context("running radar display")
}
