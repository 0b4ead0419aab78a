use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by icon-set generation and packaging.
///
/// Any entry-level failure aborts the whole run; files written for earlier
/// entries are left in place.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("source image not found: {}", .0.display())]
    MissingSourceFile(PathBuf),

    #[error("invalid icon spec: {0}")]
    InvalidSpec(String),

    #[error("rasterization failed for {points}x{points}@{scale}x: {reason}")]
    RasterizationFailed {
        points: u32,
        scale: u32,
        reason: String,
    },

    #[error("packaging failed: {0}")]
    PackagingFailed(String),

    #[error("required external tool not found: {0}")]
    MissingExternalTool(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to serialize Contents.json: {0}")]
    Manifest(#[from] serde_json::Error),
}
