use anyhow::Context;
use clap::Parser;
use generator::profile::FrameGenerator;
use radarcore::config::DEFAULT_MAX_RANGE_CM;
use std::net::SocketAddr;
use std::path::PathBuf;
use stream::server::{default_listen_address, serve, stream_to};
use tokio::net::TcpListener;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::SimulatorConfig;
use workflow::runner::Runner;

mod generator;
mod stream;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Synthetic sweep sensor for the radar display")]
struct Args {
    /// Decode this many generated frames in-process and print a summary
    #[arg(long)]
    offline: Option<usize>,
    /// Load a scenario from YAML
    #[arg(long)]
    scenario: Option<PathBuf>,
    /// Address to serve frames on
    #[arg(long, default_value_t = default_listen_address())]
    listen: SocketAddr,
    /// Write frames to stdout instead of serving TCP
    #[arg(long, default_value_t = false)]
    stdout: bool,
    #[arg(long, default_value_t = DEFAULT_MAX_RANGE_CM)]
    max_range: u32,
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = if let Some(path) = args.scenario {
        SimulatorConfig::load(path)?
    } else {
        SimulatorConfig::from_args(args.max_range, args.seed)
    };
    if let Some(description) = &config.scenario.description {
        log::info!("scenario: {}", description);
    }

    if let Some(frames) = args.offline {
        let summary = Runner::new(config).execute(frames);
        let report =
            serde_json::to_string_pretty(&summary).context("serialising offline summary")?;
        println!("{}", report);
        return Ok(());
    }

    let generator = FrameGenerator::new(config.scenario);
    let (to_stdout, listen) = (args.stdout, args.listen);
    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating runtime")?;
    runtime.block_on(async move {
        let feed = async {
            if to_stdout {
                stream_to(tokio::io::stdout(), generator).await
            } else {
                let listener = TcpListener::bind(listen)
                    .await
                    .with_context(|| format!("binding {}", listen))?;
                serve(listener, generator).await
            }
        };
        tokio::select! {
            result = feed => result,
            interrupted = signal::ctrl_c() => {
                interrupted.context("awaiting Ctrl+C to exit")?;
                log::info!("interrupted; stopping sweep");
                Ok(())
            }
        }
    })
}
