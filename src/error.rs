use std::path::PathBuf;

use thiserror::Error;

/// Error type returned by passphoto operations.
#[derive(Debug, Error)]
pub enum PassphotoError {
    #[error("cannot read or decode {}: {reason}", path.display())]
    SourceNotFound { path: PathBuf, reason: String },

    #[error("no face detected in {}", path.display())]
    NoFaceDetected { path: PathBuf },

    #[error("degenerate crop rectangle for face at ({x}, {y})")]
    InvalidBoundingBox { x: u32, y: u32 },

    #[error("face detector unavailable: {0}")]
    DetectorUnavailable(String),

    #[error("extra space ratio must be >= 0, got {0}")]
    InvalidExpansionRatio(f32),

    #[error("passport size must be nonzero, got {0}x{1}")]
    InvalidTargetSize(u32, u32),

    #[error("max detection dimension must be > 0")]
    InvalidMaxDimension,

    #[error("invalid detection parameters: {0}")]
    InvalidDetectionParams(String),

    #[error("failed to save {}: {reason}", path.display())]
    SaveError { path: PathBuf, reason: String },
}
