// THEORY:
// The `Recorder` persists captured cycles for offline rendering without ever
// slowing the decision loop down. It is a small actor: the loop hands it a
// `CaptureJob` over a bounded channel and moves on, while a background task
// encodes and writes the files. Encoding is slower than a cycle, so when the
// queue is full the capture is dropped rather than waited on. A failed write is
// logged and skipped; it never reaches the loop.

use anyhow::{Context, Result};
use image::RgbImage;
use slither_vision::CycleRecord;
use slither_vision::record::{frame_file_name, record_file_name};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Captures that may wait for the writer before new ones are dropped.
pub const CAPTURE_QUEUE_DEPTH: usize = 8;

pub struct CaptureJob {
    pub frame: RgbImage,
    pub record: CycleRecord,
}

pub struct Recorder {
    dir: PathBuf,
    tx: mpsc::Sender<CaptureJob>,
    worker: JoinHandle<u64>,
}

impl Recorder {
    /// Creates the capture directory and spawns the writer task.
    pub async fn start(dir: PathBuf) -> Result<Self> {
        Self::with_queue_depth(dir, CAPTURE_QUEUE_DEPTH).await
    }

    /// Like `start`, holding at most `depth` (at least one) pending captures.
    pub async fn with_queue_depth(dir: PathBuf, depth: usize) -> Result<Self> {
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("failed to create capture dir {}", dir.display()))?;

        let (tx, mut rx) = mpsc::channel::<CaptureJob>(depth.max(1));
        let worker_dir = dir.clone();
        let worker = tokio::spawn(async move {
            let mut written = 0u64;
            while let Some(job) = rx.recv().await {
                let dir = worker_dir.clone();
                let index = job.record.frame_index;
                match tokio::task::spawn_blocking(move || write_capture(&dir, &job)).await {
                    Ok(Ok(())) => {
                        written += 1;
                        debug!(index, "capture saved");
                    }
                    Ok(Err(error)) => warn!(index, error = %error, "capture write failed"),
                    Err(error) => warn!(index, error = %error, "capture writer panicked"),
                }
            }
            written
        });

        Ok(Self { dir, tx, worker })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Queues a capture. Never blocks; returns false if the capture was
    /// dropped because the queue is full or the writer has stopped.
    pub fn submit(&self, job: CaptureJob) -> bool {
        match self.tx.try_send(job) {
            Ok(()) => true,
            Err(TrySendError::Full(job)) => {
                debug!(index = job.record.frame_index, "capture queue full, dropping capture");
                false
            }
            Err(TrySendError::Closed(job)) => {
                warn!(index = job.record.frame_index, "capture writer has stopped, dropping capture");
                false
            }
        }
    }

    /// Waits for every queued capture to be written. Returns how many succeeded.
    pub async fn finish(self) -> Result<u64> {
        drop(self.tx);
        self.worker.await.context("capture writer task failed")
    }
}

/// Writes one frame and its record next to each other.
pub fn write_capture(dir: &Path, job: &CaptureJob) -> Result<()> {
    let index = job.record.frame_index;
    job.frame
        .save(dir.join(frame_file_name(index)))
        .with_context(|| format!("failed to save frame {index}"))?;
    std::fs::write(dir.join(record_file_name(index)), job.record.to_json()?)
        .with_context(|| format!("failed to save record {index}"))?;
    Ok(())
}

/// Decides which cycles are captured. `None` never captures; a zero interval
/// captures every cycle.
pub struct CaptureSchedule {
    interval: Option<Duration>,
    last: Option<Instant>,
}

impl CaptureSchedule {
    pub fn new(interval: Option<Duration>) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn due(&mut self, now: Instant) -> bool {
        let Some(interval) = self.interval else {
            return false;
        };
        let due = match self.last {
            None => true,
            Some(last) => now.duration_since(last) >= interval,
        };
        if due {
            self.last = Some(now);
        }
        due
    }
}
