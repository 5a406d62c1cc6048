//! Dry-run display for previewing the packs a run would write.
//!
//! Dry runs scan, parse and assemble exactly like a normal run, then print
//! the folder to file plan instead of writing anything.

use crate::MergedConfig;
use crate::generator::{PackContent, QueryPack};
use crate::utils::formatting::format_number;
use anyhow::Result;
use console::{Term, style};
use std::io::Write;
use std::path::PathBuf;

/// A pack that would be written, with its target path.
#[derive(Debug, Clone)]
pub struct PlannedPack {
    pub pack: QueryPack,
    pub path: PathBuf,
}

/// Display the dry-run plan.
///
/// # Errors
///
/// Returns an error if writing to the terminal fails.
pub fn display_dry_run_summary(planned: &[PlannedPack], config: &MergedConfig) -> Result<()> {
    let mut term = Term::stdout();

    writeln!(term)?;
    writeln!(
        term,
        "{} - No files will be written",
        style("Dry Run").yellow().bold()
    )?;

    writeln!(term)?;
    writeln!(term, "{}:", style("Configuration").bold())?;
    writeln!(term, "  Input:      {}", config.input.display())?;
    writeln!(term, "  Output:     {}", config.output.display())?;
    writeln!(term, "  Format:     {}", config.format)?;
    writeln!(term, "  Extension:  .{}", config.extension)?;
    writeln!(term, "  Author:     {}", config.author)?;
    writeln!(term, "  Exclude:    {}", exclude_display(&config.exclude))?;

    writeln!(term)?;
    writeln!(term, "{}:", style("Packs to be generated").bold())?;

    if planned.is_empty() {
        writeln!(term, "  (none)")?;
    }

    for (i, plan) in planned.iter().enumerate() {
        let prefix = if i + 1 == planned.len() {
            "\u{2514}\u{2500}"
        } else {
            "\u{251c}\u{2500}"
        };
        writeln!(
            term,
            "{} {} -> {} [{}]",
            style(prefix).dim(),
            plan.pack.name,
            plan.path.display(),
            shape_display(&plan.pack)
        )?;
    }

    let total_queries: usize = planned.iter().map(|p| p.pack.query_count()).sum();
    writeln!(term)?;
    writeln!(
        term,
        "{} packs, {} queries",
        format_number(planned.len()),
        format_number(total_queries)
    )?;
    writeln!(term)?;

    Ok(())
}

fn exclude_display(exclude: &[String]) -> String {
    if exclude.is_empty() {
        "none".to_string()
    } else {
        exclude.join(", ")
    }
}

fn shape_display(pack: &QueryPack) -> String {
    match &pack.content {
        PackContent::Query(_) => "single query".to_string(),
        PackContent::Queries(queries) => format!("{} queries", queries.len()),
    }
}
