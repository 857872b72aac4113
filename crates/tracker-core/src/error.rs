use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the pattern tracker.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// The tracker document could not be written back to disk.
    #[error("Failed to write tracker file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed or serialized.
    #[error("Failed to process JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// An upstream collaborator (pattern detector, co-occurrence detector)
    /// failed or produced output we could not understand.
    #[error("Collaborator failure: {0}")]
    Collaborator(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the tracker crates.
pub type Result<T> = std::result::Result<T, TrackerError>;
