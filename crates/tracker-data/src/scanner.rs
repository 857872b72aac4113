//! Context extraction from archived session memos.
//!
//! Scans `.md` files directly inside the session archive for case-insensitive
//! substring matches of a pattern and collects the surrounding lines as
//! human-readable example snippets. The scan is bounded: callers rely on it
//! stopping as soon as `max_contexts` fragments are collected.

use std::path::{Path, PathBuf};

use tracker_core::models::{ContextReport, PatternContexts, Tracker};
use tracing::debug;

/// Horizontal-rule marker dropped from context output.
const RULE_MARKER: &str = "--";

// ── Public API ────────────────────────────────────────────────────────────────

/// Extract up to `max_contexts` context fragments for `pattern` from the
/// archive directory.
///
/// For every line containing `pattern` (case-insensitive), up to three
/// trimmed fragments are emitted: the preceding line, the matching line, and
/// the following line. Fragments that trim to nothing or to a bare rule
/// marker are dropped. A missing directory yields an empty result, and
/// unreadable or non-UTF-8 files are skipped.
pub fn extract(pattern: &str, archive_dir: &Path, max_contexts: usize) -> Vec<String> {
    if max_contexts == 0 || !archive_dir.exists() {
        return Vec::new();
    }

    let pattern_lower = pattern.to_lowercase();
    let mut contexts: Vec<String> = Vec::new();

    for file_path in find_archive_files(archive_dir) {
        let content = match std::fs::read_to_string(&file_path) {
            Ok(c) => c,
            Err(e) => {
                debug!("Skipping unreadable archive file {}: {}", file_path.display(), e);
                continue;
            }
        };

        let lines: Vec<&str> = content.lines().collect();
        for (i, line) in lines.iter().enumerate() {
            if !line.to_lowercase().contains(&pattern_lower) {
                continue;
            }

            let mut hit: Vec<&str> = Vec::with_capacity(3);
            if i > 0 {
                hit.push(lines[i - 1].trim());
            }
            hit.push(line.trim());
            if i + 1 < lines.len() {
                hit.push(lines[i + 1].trim());
            }

            for fragment in hit {
                if fragment.is_empty() || fragment == RULE_MARKER {
                    continue;
                }
                contexts.push(fragment.to_string());
                if contexts.len() >= max_contexts {
                    return contexts;
                }
            }
        }
    }

    contexts
}

/// Names of the `limit` most frequent patterns, by count descending.
///
/// The sort is stable, so equal counts keep the map's iteration order.
/// A record with a missing count in the source file reads as 0.
pub fn top_patterns(tracker: &Tracker, limit: usize) -> Vec<String> {
    let mut entries: Vec<(&String, u64)> = tracker
        .patterns
        .iter()
        .map(|(name, record)| (name, record.count))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries
        .into_iter()
        .take(limit)
        .map(|(name, _)| name.clone())
        .collect()
}

/// Build the context report for the `top_n` most frequent patterns.
///
/// An empty tracker or an empty selection yields an empty report.
pub fn build_context_report(
    tracker: &Tracker,
    archive_dir: &Path,
    top_n: usize,
    max_contexts: usize,
) -> ContextReport {
    let mut report = ContextReport::default();

    for name in top_patterns(tracker, top_n) {
        let count = tracker.patterns.get(&name).map_or(0, |r| r.count);
        let contexts = extract(&name, archive_dir, max_contexts);
        report.patterns.insert(name, PatternContexts { count, contexts });
    }

    report
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Regular `.md` files directly inside `archive_dir` (non-recursive),
/// sorted by path for deterministic accumulation order.
fn find_archive_files(archive_dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(archive_dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext == "md")
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

// ── Tests ─────────────────────────────────────────────────────────────────────
