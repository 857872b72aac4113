mod bootstrap;
mod detector;

use std::path::Path;

use anyhow::{bail, Result};
use clap::Parser;
use tracker_core::models::{ContextReport, UpdateStats};
use tracker_core::settings::{Cli, Command};
use tracker_data::{merger, scanner, store};

fn main() -> Result<()> {
    let cli = Cli::parse();

    bootstrap::setup_logging(&cli.log_level)?;

    let tracker_path = cli.tracker_path();
    let archive_path = cli.archive_path();
    bootstrap::ensure_directories(&archive_path)?;

    tracing::debug!(
        "pattern-tracker v{}: tracker {}, archive {}",
        env!("CARGO_PKG_VERSION"),
        tracker_path.display(),
        archive_path.display()
    );

    match cli.command {
        Command::Track {
            ref observations,
            ref detector_cmd,
            ref contexts,
            no_contexts,
            ref cooccurrences,
            ref cooccurrence_cmd,
            top_n,
            max_contexts,
            json,
        } => {
            let stats = run_track(
                &tracker_path,
                &archive_path,
                observations.as_deref(),
                detector_cmd.as_deref(),
                contexts.as_deref(),
                no_contexts,
                cooccurrences.as_deref(),
                cooccurrence_cmd.as_deref(),
                top_n,
                max_contexts,
            )?;

            if json {
                println!("{}", serde_json::to_string(&stats)?);
            } else {
                println!(
                    "Frequency tracker updated: {} patterns tracked, {} promotion candidates",
                    stats.pattern_count, stats.candidate_count
                );
            }
        }

        Command::Contexts {
            top_n,
            max_contexts,
        } => {
            let tracker = store::load(&tracker_path);
            let report =
                scanner::build_context_report(&tracker, &archive_path, top_n, max_contexts);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

/// Gather the collaborator inputs and run the frequency merge.
#[allow(clippy::too_many_arguments)]
fn run_track(
    tracker_path: &Path,
    archive_path: &Path,
    observations: Option<&Path>,
    detector_cmd: Option<&str>,
    contexts: Option<&Path>,
    no_contexts: bool,
    cooccurrences: Option<&Path>,
    cooccurrence_cmd: Option<&str>,
    top_n: usize,
    max_contexts: usize,
) -> Result<UpdateStats> {
    let observations = match (observations, detector_cmd) {
        (Some(path), _) => detector::observations_from_file(path)?,
        (None, Some(cmd)) => detector::observations_from_command(cmd)?,
        (None, None) => bail!("one of --observations or --detector-cmd is required"),
    };

    // The report is built from the pre-update tracker state, matching a scan
    // that runs ahead of the merge.
    let context_report: Option<ContextReport> = if no_contexts {
        None
    } else if let Some(path) = contexts {
        Some(detector::context_report_from_file(path)?)
    } else {
        let tracker = store::load(tracker_path);
        Some(scanner::build_context_report(
            &tracker,
            archive_path,
            top_n,
            max_contexts,
        ))
    };

    let cooccurrences: Option<Vec<serde_json::Value>> = match (cooccurrences, cooccurrence_cmd) {
        (Some(path), _) => Some(detector::cooccurrences_from_file(path)?),
        (None, Some(cmd)) => Some(detector::cooccurrences_from_command(cmd)?),
        (None, None) => None,
    };

    let stats = merger::update(
        tracker_path,
        &observations,
        context_report.as_ref(),
        cooccurrences,
    )?;
    Ok(stats)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
