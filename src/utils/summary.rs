// Copyright (c) 2025-2026 the sentinel-packs contributors
// SPDX-License-Identifier: Apache-2.0

//! Summary display for completed runs.
//!
//! Prints the generated pack files and run statistics after packs have been
//! written (or validated, with `--validate-only`).

use crate::RunSummary;
use crate::utils::formatting::{format_number, format_size};
use anyhow::Result;
use console::{Term, style};
use std::io::Write;
use std::time::Duration;

/// Maximum number of pack files listed before the list is truncated.
const MAX_LISTED_PACKS: usize = 20;

/// Display the summary of a run.
///
/// Does nothing when `quiet` is set.
///
/// # Errors
///
/// Returns an error if writing to the terminal fails.
pub fn display_success_summary(summary: &RunSummary, quiet: bool) -> Result<()> {
    if quiet {
        return Ok(());
    }

    let mut term = Term::stdout();

    writeln!(term)?;
    if summary.written {
        writeln!(
            term,
            "{} {}",
            style("\u{2713}").green().bold(),
            style("Query packs generated").bold()
        )?;

        writeln!(term)?;
        writeln!(term, "{}:", style("Packs").bold())?;

        let shown = summary.outputs.len().min(MAX_LISTED_PACKS);
        for (i, result) in summary.outputs.iter().take(shown).enumerate() {
            let last = i + 1 == shown && shown == summary.outputs.len();
            let prefix = if last { "\u{2514}\u{2500}" } else { "\u{251c}\u{2500}" };
            writeln!(
                term,
                "{} {} ({} {}, {})",
                style(prefix).dim(),
                result.path.display(),
                result.query_count,
                plural(result.query_count, "query", "queries"),
                format_size(get_file_size(&result.path))
            )?;
        }
        if shown < summary.outputs.len() {
            writeln!(
                term,
                "{} ... and {} more",
                style("\u{2514}\u{2500}").dim(),
                format_number(summary.outputs.len() - shown)
            )?;
        }
    } else {
        writeln!(
            term,
            "{} {}",
            style("\u{2713}").green().bold(),
            style("All query packs are valid").bold()
        )?;
    }

    writeln!(term)?;
    writeln!(term, "{}:", style("Summary").bold())?;
    writeln!(
        term,
        "{} Packs generated: {}",
        style("\u{251c}\u{2500}").dim(),
        format_number(summary.packs_generated)
    )?;
    writeln!(
        term,
        "{} Queries processed: {}",
        style("\u{251c}\u{2500}").dim(),
        format_number(summary.queries_processed)
    )?;
    if summary.files_skipped > 0 {
        writeln!(
            term,
            "{} Files skipped: {}",
            style("\u{251c}\u{2500}").dim(),
            style(format_number(summary.files_skipped)).yellow()
        )?;
    }
    if summary.empty_folders > 0 {
        writeln!(
            term,
            "{} Folders without valid queries: {}",
            style("\u{251c}\u{2500}").dim(),
            style(format_number(summary.empty_folders)).yellow()
        )?;
    }
    writeln!(
        term,
        "{} Output directory: {}",
        style("\u{251c}\u{2500}").dim(),
        summary.output_dir.display()
    )?;
    writeln!(
        term,
        "{} Time: {}",
        style("\u{2514}\u{2500}").dim(),
        format_duration(summary.elapsed)
    )?;
    writeln!(term)?;

    Ok(())
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}

/// Get the file size in bytes.
fn get_file_size(path: &std::path::Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Format a duration for display (e.g., "0.4s" or "1m 23.0s").
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs >= 60.0 {
        let mins = (secs / 60.0).floor() as u64;
        let remaining_secs = secs - (mins as f64 * 60.0);
        format!("{}m {:.1}s", mins, remaining_secs)
    } else {
        format!("{:.1}s", secs)
    }
}
