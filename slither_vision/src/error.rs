// THEORY:
// Every failure the vision core can report lives in `VisionError`. There are
// only two real failure families: a configuration that cannot describe a
// polar sampling grid, and a frame that does not match the configured
// geometry. Both are fatal for the cycle that hit them. Nothing here retries;
// the driving loop decides whether to stop or try the next frame.

use thiserror::Error;

pub type Result<T, E = VisionError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum VisionError {
    #[error("invalid steering config: {0}")]
    InvalidConfig(String),

    /// A sample point landed outside the frame. The geometry and the captured
    /// region disagree, so the grid for this frame would be meaningless.
    #[error(
        "sample ({ray}, {sample}) maps to pixel ({x}, {y}) outside the {width}x{height} frame"
    )]
    SampleOutOfBounds {
        ray: usize,
        sample: usize,
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },

    #[error("frame buffer holds {actual} bytes, expected {expected} for an RGB frame")]
    FrameSize { expected: usize, actual: usize },

    #[error("failed to parse steering config TOML")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to read steering config")]
    Io(#[from] std::io::Error),

    #[error("malformed cycle record")]
    Record(#[from] serde_json::Error),
}
