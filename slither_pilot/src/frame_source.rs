// THEORY:
// A `FrameSampler` is where frames come from. The vision core only ever sees
// an `RgbImage`; whether it was grabbed from the screen, replayed from disk,
// or synthesized is decided here. Alpha is dropped on the way in.

use anyhow::{Context, Result};
use image::RgbImage;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

const FRAME_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "bmp"];

pub trait FrameSampler {
    /// The next frame, or `None` once the source is exhausted.
    fn next_frame(&mut self) -> Result<Option<RgbImage>>;
}

/// Replays image files from a directory in file-name order.
pub struct DirectorySampler {
    pending: VecDeque<PathBuf>,
}

impl DirectorySampler {
    pub fn new(dir: &Path) -> Result<Self> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)
            .with_context(|| format!("failed to list frames in {}", dir.display()))?
        {
            let path = entry?.path();
            let is_frame = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false);
            if is_frame {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(Self {
            pending: paths.into(),
        })
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl FrameSampler for DirectorySampler {
    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        let Some(path) = self.pending.pop_front() else {
            return Ok(None);
        };
        let frame = image::open(&path)
            .with_context(|| format!("failed to decode frame {}", path.display()))?
            .to_rgb8();
        Ok(Some(frame))
    }
}

/// An endless all-black frame of fixed size.
pub struct BlankSampler {
    frame: RgbImage,
}

impl BlankSampler {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            frame: RgbImage::new(width, height),
        }
    }
}

impl FrameSampler for BlankSampler {
    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        Ok(Some(self.frame.clone()))
    }
}
