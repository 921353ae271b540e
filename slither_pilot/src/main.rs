use anyhow::{Context, Result, bail};
use clap::Parser;
use slither_vision::{SteeringConfig, SteeringPipeline};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod actuator;
mod driver;
mod frame_source;
mod recorder;

use actuator::{DEFAULT_POINTER_RADIUS, PointerActuator};
use driver::{DriveOptions, drive};
use frame_source::{BlankSampler, DirectorySampler, FrameSampler};
use recorder::{CaptureSchedule, Recorder};

/// Steers the agent from a stream of frames, one heading per frame.
#[derive(Debug, Parser)]
#[command(name = "slither_pilot", version)]
struct Args {
    /// Steering config TOML. The built-in defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory of frame images to replay in file-name order.
    #[arg(long, conflicts_with = "blank")]
    frames: Option<PathBuf>,

    /// Feed all-black frames of the given size, e.g. `1280x800`.
    #[arg(long, value_parser = parse_dimensions)]
    blank: Option<(u32, u32)>,

    /// Skip sampling and treat every cell as occupied.
    #[arg(long)]
    debug: bool,

    /// Where captured frames and records are written.
    #[arg(long, default_value = "capture")]
    capture_dir: PathBuf,

    /// Capture a frame at most this often. 0 captures every cycle; omit to disable.
    #[arg(long)]
    capture_interval_ms: Option<u64>,

    /// Minimum time between cycles.
    #[arg(long, default_value_t = 0)]
    cycle_interval_ms: u64,

    /// Stop after this many cycles.
    #[arg(long)]
    max_cycles: Option<u64>,

    /// Distance of the pointer from the agent's head, in pixels.
    #[arg(long, default_value_t = DEFAULT_POINTER_RADIUS)]
    pointer_radius: f64,
}

fn parse_dimensions(raw: &str) -> Result<(u32, u32), String> {
    let (w, h) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {raw:?}"))?;
    let width = w.trim().parse().map_err(|e| format!("bad width {w:?}: {e}"))?;
    let height = h.trim().parse().map_err(|e| format!("bad height {h:?}: {e}"))?;
    if width == 0 || height == 0 {
        return Err("frame dimensions must be non-zero".to_owned());
    }
    Ok((width, height))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SteeringConfig::from_path(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => SteeringConfig::default(),
    };
    config.debug |= args.debug;
    let pipeline = SteeringPipeline::new(config).context("steering config rejected")?;
    let config = pipeline.config();

    let mut sampler: Box<dyn FrameSampler> = match (&args.frames, args.blank) {
        (Some(dir), _) => {
            let sampler = DirectorySampler::new(dir)?;
            info!(frames = sampler.remaining(), dir = %dir.display(), "replaying frames");
            Box::new(sampler)
        }
        (None, Some((width, height))) => Box::new(BlankSampler::new(width, height)),
        (None, None) if config.debug => Box::new(BlankSampler::new(1280, 800)),
        (None, None) => bail!("no frame source: pass --frames <DIR> or --blank <WxH>"),
    };
    let mut actuator = PointerActuator::new(config.center_point, args.pointer_radius);

    let capture_interval = args.capture_interval_ms.map(Duration::from_millis);
    let mut schedule = CaptureSchedule::new(capture_interval);
    let recorder = match capture_interval {
        Some(_) => Some(Recorder::start(args.capture_dir.clone()).await?),
        None => None,
    };

    info!(
        rays = config.ray_count(),
        samples = config.sample_count(),
        debug = config.debug,
        capturing = recorder.is_some(),
        "pilot starting"
    );

    let options = DriveOptions {
        max_cycles: args.max_cycles,
        cycle_interval: Duration::from_millis(args.cycle_interval_ms),
        initial_heading: 0.0,
    };
    let result = drive(
        &pipeline,
        sampler.as_mut(),
        &mut actuator,
        recorder.as_ref(),
        &mut schedule,
        &options,
    )
    .await;

    if let Some(recorder) = recorder {
        let dir = recorder.dir().to_path_buf();
        let written = recorder.finish().await?;
        info!(written, dir = %dir.display(), "captures flushed");
    }

    let summary = result?;
    info!(
        cycles = summary.cycles,
        captures = summary.captures,
        heading = summary.final_heading,
        pointer = ?actuator.last_target(),
        "pilot finished"
    );
    Ok(())
}
