//! Persistence for the tracker document.
//!
//! Loading is deliberately infallible: a missing, empty, or corrupted file
//! yields a fresh canonical document so that one bad write can never wedge
//! the tracking pipeline. Saving is atomic via a sibling temp file.

use std::path::Path;

use tracker_core::error::{Result, TrackerError};
use tracker_core::models::Tracker;
use tracing::{debug, warn};

/// Load the tracker document at `path`.
///
/// Returns the canonical empty document when the file does not exist, is
/// zero-length, or does not parse as JSON. A parsed document missing any of
/// the three top-level keys gets them filled with empty containers.
pub fn load(path: &Path) -> Tracker {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            debug!("Tracker file {} not readable ({}); starting fresh", path.display(), e);
            return Tracker::default();
        }
    };

    if content.trim().is_empty() {
        debug!("Tracker file {} is empty; starting fresh", path.display());
        return Tracker::default();
    }

    match serde_json::from_str(&content) {
        Ok(tracker) => tracker,
        Err(e) => {
            warn!(
                "Tracker file {} is corrupted ({}); reinitializing",
                path.display(),
                e
            );
            Tracker::default()
        }
    }
}

/// Persist `tracker` to `path` as pretty-printed UTF-8 JSON.
///
/// Parent directories are created as needed. The document is written to a
/// sibling temp file and renamed into place so a concurrent [`load`] never
/// observes a partial write.
pub fn save(path: &Path, tracker: &Tracker) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| TrackerError::FileWrite {
            path: path.to_path_buf(),
            source,
        })?;
    }

    let json = serde_json::to_string_pretty(tracker)?;

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &json).map_err(|source| TrackerError::FileWrite {
        path: tmp.clone(),
        source,
    })?;
    std::fs::rename(&tmp, path).map_err(|source| TrackerError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
