// THEORY:
// The driver is the loop around the vision core. Each cycle it pulls a frame,
// runs the pipeline with the previous heading, hands the new heading to the
// actuator, and optionally queues a capture. The heading is a local variable
// of the loop; it is the only thing that survives from one cycle to the next.

use crate::actuator::Actuator;
use crate::frame_source::FrameSampler;
use crate::recorder::{CaptureJob, CaptureSchedule, Recorder};
use anyhow::{Context, Result};
use slither_vision::{CycleRecord, SteeringPipeline};
use std::time::{Duration, Instant};
use tokio::time::{Interval, MissedTickBehavior};
use tracing::info;

pub struct DriveOptions {
    pub max_cycles: Option<u64>,
    /// Minimum time between cycles. Zero runs as fast as frames arrive.
    pub cycle_interval: Duration,
    pub initial_heading: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveSummary {
    pub cycles: u64,
    pub captures: u64,
    pub final_heading: f64,
}

pub async fn drive(
    pipeline: &SteeringPipeline,
    sampler: &mut dyn FrameSampler,
    actuator: &mut dyn Actuator,
    recorder: Option<&Recorder>,
    schedule: &mut CaptureSchedule,
    options: &DriveOptions,
) -> Result<DriveSummary> {
    let mut ticker = (!options.cycle_interval.is_zero()).then(|| {
        let mut ticker = tokio::time::interval(options.cycle_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    });
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut heading = options.initial_heading;
    let mut cycles = 0u64;
    let mut captures = 0u64;

    loop {
        if options.max_cycles.is_some_and(|max| cycles >= max) {
            break;
        }

        tokio::select! {
            _ = &mut shutdown => {
                info!("interrupted, stopping");
                break;
            }
            _ = tick(&mut ticker) => {}
        }

        let Some(frame) = sampler.next_frame()? else {
            info!("frame source exhausted");
            break;
        };

        let outcome = pipeline
            .cycle(&frame, heading)
            .with_context(|| format!("cycle {cycles} failed"))?;
        actuator.steer(outcome.heading)?;

        if let Some(recorder) = recorder {
            if schedule.due(Instant::now()) {
                let job = CaptureJob {
                    frame,
                    record: CycleRecord {
                        frame_index: captures,
                        heading: outcome.heading,
                        grid: outcome.grid,
                    },
                };
                // A dropped capture does not use up its index.
                if recorder.submit(job) {
                    captures += 1;
                }
            }
        }

        heading = outcome.heading;
        cycles += 1;
    }

    Ok(DriveSummary {
        cycles,
        captures,
        final_heading: heading,
    })
}

async fn tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => tokio::task::yield_now().await,
    }
}
