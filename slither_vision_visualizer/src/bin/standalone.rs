use anyhow::{Context, Result};
use clap::Parser;
use slither_vision::SteeringConfig;
use slither_vision_visualizer::render_capture_dir;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Renders the captures a pilot run left behind.
#[derive(Debug, Parser)]
#[command(name = "slither_vision_visualizer", version)]
struct Args {
    /// Directory holding frame{n}.png and record{n}.json pairs.
    #[arg(default_value = "capture")]
    dir: PathBuf,

    /// Steering config the captures were taken with.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also write a text dump of each grid.
    #[arg(long)]
    text: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => SteeringConfig::from_path(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => SteeringConfig::default(),
    };

    let rendered = render_capture_dir(&args.dir, &config, args.text)?;
    info!(rendered, dir = %args.dir.display(), "done");
    Ok(())
}
