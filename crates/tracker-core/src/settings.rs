use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

// ── CLI settings ───────────────────────────────────────────────────────────────

/// Pattern frequency tracking for project session archives
#[derive(Parser, Debug, Clone)]
#[command(
    name = "pattern-tracker",
    about = "Track pattern frequency across sessions and extract example contexts",
    version
)]
pub struct Cli {
    /// Project root (used to derive the claude dir when --claude-dir is unset)
    #[arg(long, env = "PROJECT_ROOT")]
    pub project_root: Option<PathBuf>,

    /// Claude data directory holding the tracker and session archive
    #[arg(long, env = "CLAUDE_DIR")]
    pub claude_dir: Option<PathBuf>,

    /// Explicit tracker file path (overrides the derived location)
    #[arg(long)]
    pub tracker_file: Option<PathBuf>,

    /// Explicit session archive directory (overrides the derived location)
    #[arg(long)]
    pub archive_dir: Option<PathBuf>,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Merge new observations into the tracker and persist it
    Track {
        /// JSON file with the observation array, or "-" for stdin
        #[arg(long, conflicts_with = "detector_cmd")]
        observations: Option<PathBuf>,

        /// Command producing the observation array on stdout
        #[arg(long)]
        detector_cmd: Option<String>,

        /// Pre-computed context report file (default: scan the archive)
        #[arg(long, conflicts_with = "no_contexts")]
        contexts: Option<PathBuf>,

        /// Skip context extraction entirely
        #[arg(long)]
        no_contexts: bool,

        /// JSON file with co-occurrence records to store
        #[arg(long, conflicts_with = "cooccurrence_cmd")]
        cooccurrences: Option<PathBuf>,

        /// Command producing co-occurrence records on stdout
        #[arg(long)]
        cooccurrence_cmd: Option<String>,

        /// Number of top patterns to extract contexts for
        #[arg(long, default_value = "10")]
        top_n: usize,

        /// Maximum context fragments per pattern
        #[arg(long, default_value = "5")]
        max_contexts: usize,

        /// Print the update statistics as JSON instead of a summary line
        #[arg(long)]
        json: bool,
    },

    /// Print the context report for the top patterns as JSON
    Contexts {
        /// Number of top patterns to process
        #[arg(long, default_value = "10")]
        top_n: usize,

        /// Maximum context fragments per pattern
        #[arg(long, default_value = "5")]
        max_contexts: usize,
    },
}

// ── Path resolution ────────────────────────────────────────────────────────────

impl Cli {
    /// The claude data directory: `--claude-dir` when given, otherwise
    /// `<project_root>/.claude` where the project root defaults to the
    /// current working directory.
    pub fn resolved_claude_dir(&self) -> PathBuf {
        if let Some(dir) = &self.claude_dir {
            return dir.clone();
        }
        let root = self
            .project_root
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
        root.join(".claude")
    }

    /// Path of the persisted tracker document.
    pub fn tracker_path(&self) -> PathBuf {
        self.tracker_file
            .clone()
            .unwrap_or_else(|| tracker_path_in(&self.resolved_claude_dir()))
    }

    /// Directory holding the archived session memos the scanner reads.
    pub fn archive_path(&self) -> PathBuf {
        self.archive_dir
            .clone()
            .unwrap_or_else(|| archive_path_in(&self.resolved_claude_dir()))
    }
}

/// Tracker location under a given claude dir.
pub fn tracker_path_in(claude_dir: &Path) -> PathBuf {
    claude_dir.join("as_you").join("pattern_tracker.json")
}

/// Session archive location under a given claude dir.
pub fn archive_path_in(claude_dir: &Path) -> PathBuf {
    claude_dir.join("as_you").join("session_archive")
}

// ── Tests ──────────────────────────────────────────────────────────────────────
