use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to callers. Block-level problems (missing or undecodable
/// images, overflowing blocks) never show up here; they are reported as
/// [`crate::Diagnostic`]s on the render output instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid resource manifest '{path}': {reason}")]
    InvalidManifest { path: PathBuf, reason: String },

    #[error("image decode failed: {0}")]
    ImageDecode(String),

    #[error("PDF assembly failed: {0}")]
    Pdf(String),
}
