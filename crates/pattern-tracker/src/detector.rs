//! Glue to the external collaborators that feed the tracker.
//!
//! Observations come either from a JSON file (or stdin) or from a detector
//! command whose stdout is the observation array. Context reports and
//! co-occurrence records are sourced the same way. Any collaborator that
//! fails to run, exits non-zero, or produces unparsable output is a hard
//! failure surfaced to the user; this is the only failure class the tracker
//! does not recover from locally.

use std::io::Read;
use std::path::Path;
use std::process::Command;

use tracker_core::error::{Result, TrackerError};
use tracker_core::models::{ContextReport, Observation};
use tracing::debug;

// ── Observations ──────────────────────────────────────────────────────────────

/// Read the observation array from `path`, or from stdin when `path` is `-`.
pub fn observations_from_file(path: &Path) -> Result<Vec<Observation>> {
    let content = read_input(path)?;
    serde_json::from_str(&content).map_err(|e| {
        TrackerError::Collaborator(format!(
            "observations from {} are not a valid JSON array: {}",
            path.display(),
            e
        ))
    })
}

/// Run the detector command and parse its stdout as the observation array.
pub fn observations_from_command(cmd: &str) -> Result<Vec<Observation>> {
    let stdout = run_command(cmd)?;
    serde_json::from_str(&stdout)
        .map_err(|e| TrackerError::Collaborator(format!("detector output unparsable: {}", e)))
}

// ── Context reports ───────────────────────────────────────────────────────────

/// Read a pre-computed context report from `path` (or stdin for `-`).
pub fn context_report_from_file(path: &Path) -> Result<ContextReport> {
    let content = read_input(path)?;
    serde_json::from_str(&content).map_err(|e| {
        TrackerError::Collaborator(format!(
            "context report {} is not valid: {}",
            path.display(),
            e
        ))
    })
}

// ── Co-occurrences ────────────────────────────────────────────────────────────

/// Read co-occurrence records from `path` (or stdin for `-`).
pub fn cooccurrences_from_file(path: &Path) -> Result<Vec<serde_json::Value>> {
    let content = read_input(path)?;
    serde_json::from_str(&content).map_err(|e| {
        TrackerError::Collaborator(format!(
            "co-occurrence data {} is not a valid JSON array: {}",
            path.display(),
            e
        ))
    })
}

/// Run the co-occurrence detector command and parse its stdout.
pub fn cooccurrences_from_command(cmd: &str) -> Result<Vec<serde_json::Value>> {
    let stdout = run_command(cmd)?;
    serde_json::from_str(&stdout).map_err(|e| {
        TrackerError::Collaborator(format!("co-occurrence detector output unparsable: {}", e))
    })
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        return Ok(content);
    }
    std::fs::read_to_string(path).map_err(|e| {
        TrackerError::Collaborator(format!("cannot read {}: {}", path.display(), e))
    })
}

/// Run a whitespace-split command line and return its stdout.
///
/// Spawn failure, a non-zero exit status, or non-UTF-8 stdout are all
/// collaborator failures.
fn run_command(cmd: &str) -> Result<String> {
    let mut parts = cmd.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| TrackerError::Collaborator("empty collaborator command".to_string()))?;

    debug!("Running collaborator command: {}", cmd);

    let output = Command::new(program)
        .args(parts)
        .output()
        .map_err(|e| TrackerError::Collaborator(format!("failed to run '{}': {}", cmd, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(TrackerError::Collaborator(format!(
            "'{}' exited with {}: {}",
            cmd,
            output.status,
            stderr.trim()
        )));
    }

    String::from_utf8(output.stdout)
        .map_err(|_| TrackerError::Collaborator(format!("'{}' produced non-UTF-8 output", cmd)))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
