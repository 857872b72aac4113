//! Frequency merging: fold one session's observations into the tracker.
//!
//! A single linear batch transform: load the tracker, bump counts and session
//! stamps, fold in context snippets and co-occurrence records, persist, and
//! report summary statistics.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::Local;
use tracker_core::error::Result;
use tracker_core::models::{ContextReport, Observation, PatternRecord, UpdateStats};
use tracing::debug;

use crate::store;

/// Merge `observations` into the tracker at `tracker_path` and persist it.
///
/// The date stamp is computed once for the whole call, so several
/// observations of the same word in one call produce a single session entry.
/// `context_report`, when given, overwrites the `contexts` of every pattern
/// present in both the report and the tracker. `cooccurrences` replaces the
/// stored records wholesale when given, including when it is an empty list;
/// `None` leaves them untouched.
pub fn update(
    tracker_path: &Path,
    observations: &[Observation],
    context_report: Option<&ContextReport>,
    cooccurrences: Option<Vec<serde_json::Value>>,
) -> Result<UpdateStats> {
    let mut tracker = store::load(tracker_path);

    let current_date = Local::now().format("%Y-%m-%d").to_string();

    for observation in observations {
        if observation.word.is_empty() {
            debug!("Skipping observation with empty word");
            continue;
        }
        apply_observation(
            &mut tracker.patterns,
            &observation.word,
            observation.count,
            &current_date,
        );
    }

    if let Some(report) = context_report {
        merge_contexts(&mut tracker.patterns, report);
    }

    if let Some(records) = cooccurrences {
        tracker.cooccurrences = records;
    }

    store::save(tracker_path, &tracker)?;

    Ok(UpdateStats {
        pattern_count: tracker.patterns.len(),
        candidate_count: tracker.promotion_candidates.len(),
    })
}

/// Bump an existing pattern or create a fresh record for a new one.
fn apply_observation(
    patterns: &mut BTreeMap<String, PatternRecord>,
    word: &str,
    count: u64,
    current_date: &str,
) {
    match patterns.get_mut(word) {
        Some(record) => {
            record.count += count;
            record.last_seen = current_date.to_string();
            if !record.sessions.iter().any(|s| s == current_date) {
                record.sessions.push(current_date.to_string());
            }
        }
        None => {
            patterns.insert(word.to_string(), PatternRecord::new(count, current_date));
        }
    }
}

/// Overwrite `contexts` for every pattern the report and tracker share.
/// Report-only names are ignored; tracker-only names keep their snippets.
fn merge_contexts(patterns: &mut BTreeMap<String, PatternRecord>, report: &ContextReport) {
    for (word, info) in &report.patterns {
        if let Some(record) = patterns.get_mut(word) {
            record.contexts = Some(info.contexts.clone());
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_core::models::{PatternContexts, Tracker};
    use tempfile::TempDir;

    fn obs(word: &str, count: u64) -> Observation {
        Observation {
            word: word.to_string(),
            count,
        }
    }

    fn today() -> String {
        Local::now().format("%Y-%m-%d").to_string()
    }

    #[test]
    fn test_update_creates_new_patterns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tracker.json");

        let stats = update(&path, &[obs("test", 3), obs("python", 5)], None, None).unwrap();
        assert_eq!(stats.pattern_count, 2);
        assert_eq!(stats.candidate_count, 0);

        let tracker = store::load(&path);
        let record = &tracker.patterns["python"];
        assert_eq!(record.count, 5);
        assert_eq!(record.last_seen, today());
        assert_eq!(record.sessions, vec![today()]);
        assert!(!record.promoted);
        assert!(record.contexts.is_none());
    }

    #[test]
    fn test_update_accumulates_counts_and_dedups_sessions() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tracker.json");

        update(&path, &[obs("python", 5)], None, None).unwrap();
        update(&path, &[obs("python", 3)], None, None).unwrap();

        let tracker = store::load(&path);
        let record = &tracker.patterns["python"];
        assert_eq!(record.count, 8);
        assert_eq!(record.sessions.len(), 1);
    }

    #[test]
    fn test_update_same_word_twice_in_one_call() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tracker.json");

        let stats = update(&path, &[obs("deploy", 2), obs("deploy", 4)], None, None).unwrap();
        assert_eq!(stats.pattern_count, 1);

        let tracker = store::load(&path);
        let record = &tracker.patterns["deploy"];
        assert_eq!(record.count, 6);
        assert_eq!(record.sessions.len(), 1);
    }

    #[test]
    fn test_update_skips_empty_words() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tracker.json");

        let stats = update(&path, &[obs("", 9), obs("real", 1)], None, None).unwrap();
        assert_eq!(stats.pattern_count, 1);
    }

    #[test]
    fn test_empty_update_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tracker.json");

        update(&path, &[obs("python", 5)], None, None).unwrap();
        let before = store::load(&path);

        let stats = update(&path, &[], None, None).unwrap();
        assert_eq!(stats.pattern_count, 1);
        assert_eq!(store::load(&path), before);
    }

    #[test]
    fn test_context_report_overwrites_matching_patterns_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tracker.json");

        update(&path, &[obs("python", 5), obs("deploy", 2)], None, None).unwrap();

        let mut report = ContextReport::default();
        report.patterns.insert(
            "python".to_string(),
            PatternContexts {
                count: 5,
                contexts: vec!["example line".to_string()],
            },
        );
        report.patterns.insert(
            "unknown".to_string(),
            PatternContexts {
                count: 1,
                contexts: vec!["ignored".to_string()],
            },
        );

        update(&path, &[], Some(&report), None).unwrap();

        let tracker = store::load(&path);
        assert_eq!(
            tracker.patterns["python"].contexts,
            Some(vec!["example line".to_string()])
        );
        assert!(tracker.patterns["deploy"].contexts.is_none());
        assert!(!tracker.patterns.contains_key("unknown"));
    }

    #[test]
    fn test_cooccurrences_replaced_wholesale() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tracker.json");

        let first = vec![serde_json::json!(["a", "b"])];
        update(&path, &[], None, Some(first.clone())).unwrap();
        assert_eq!(store::load(&path).cooccurrences, first);

        // An explicit empty list clears; None leaves untouched.
        update(&path, &[], None, Some(Vec::new())).unwrap();
        assert!(store::load(&path).cooccurrences.is_empty());

        update(&path, &[], None, Some(first.clone())).unwrap();
        update(&path, &[], None, None).unwrap();
        assert_eq!(store::load(&path).cooccurrences, first);
    }

    #[test]
    fn test_promotion_candidates_preserved() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tracker.json");

        let mut tracker = Tracker::default();
        tracker
            .promotion_candidates
            .push(serde_json::json!({"word": "deploy", "score": 0.9}));
        store::save(&path, &tracker).unwrap();

        let stats = update(&path, &[obs("deploy", 1)], None, None).unwrap();
        assert_eq!(stats.candidate_count, 1);
        assert_eq!(
            store::load(&path).promotion_candidates,
            tracker.promotion_candidates
        );
    }

    #[test]
    fn test_update_recovers_from_corrupted_tracker() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tracker.json");
        std::fs::write(&path, "{broken json").unwrap();

        let stats = update(&path, &[obs("fresh", 1)], None, None).unwrap();
        assert_eq!(stats.pattern_count, 1);
    }

    #[test]
    fn test_promoted_flag_survives_updates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tracker.json");

        let mut tracker = Tracker::default();
        let mut record = PatternRecord::new(5, "2026-01-01");
        record.promoted = true;
        tracker.patterns.insert("deploy".to_string(), record);
        store::save(&path, &tracker).unwrap();

        update(&path, &[obs("deploy", 1)], None, None).unwrap();
        assert!(store::load(&path).patterns["deploy"].promoted);
    }
}
