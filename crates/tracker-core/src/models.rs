use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The persisted tracker document.
///
/// All three fields default to empty containers so that a document missing a
/// top-level key is healed on load. `promotion_candidates` and
/// `cooccurrences` are written by external collaborators and carried through
/// as opaque JSON values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tracker {
    /// Pattern name to its cumulative statistics.
    #[serde(default)]
    pub patterns: BTreeMap<String, PatternRecord>,
    /// Opaque scorer output, preserved across updates.
    #[serde(default)]
    pub promotion_candidates: Vec<serde_json::Value>,
    /// Opaque co-occurrence records, wholesale-replaced on update.
    #[serde(default)]
    pub cooccurrences: Vec<serde_json::Value>,
}

/// Cumulative statistics for one tracked pattern.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternRecord {
    /// Total occurrences across all sessions.
    #[serde(default)]
    pub count: u64,
    /// Date (`YYYY-MM-DD`) of the most recent update.
    #[serde(default)]
    pub last_seen: String,
    /// Dates on which the pattern was observed, in insertion order, no
    /// duplicates.
    #[serde(default)]
    pub sessions: Vec<String>,
    /// Set by the external scorer; never cleared here.
    #[serde(default)]
    pub promoted: bool,
    /// Example snippets from the archive, present only after a context merge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contexts: Option<Vec<String>>,
    /// Fields written by external collaborators (e.g. scores), preserved
    /// verbatim across updates.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PatternRecord {
    /// A fresh record for a pattern first observed today.
    pub fn new(count: u64, date: &str) -> Self {
        Self {
            count,
            last_seen: date.to_string(),
            sessions: vec![date.to_string()],
            promoted: false,
            contexts: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// One session's occurrence tally for a single word, supplied by the
/// pattern-detection collaborator. An empty `word` marks the observation as
/// invalid and it is skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub count: u64,
}

/// Context snippets per pattern, as produced by the scanner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextReport {
    #[serde(default)]
    pub patterns: BTreeMap<String, PatternContexts>,
}

/// Current count plus example snippets for one pattern.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternContexts {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub contexts: Vec<String>,
}

/// Summary statistics returned by an update call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateStats {
    /// Number of distinct patterns in the tracker after the update.
    pub pattern_count: usize,
    /// Number of promotion-candidate records currently in the tracker.
    pub candidate_count: usize,
}
