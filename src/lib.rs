//! # sentinel-packs
//!
//! Turns a folder tree of KQL query files into query packs, one pack per
//! folder. The pipeline runs in five stages:
//!
//! 1. **Init** - Configuration validation and input path check
//! 2. **Scanning** - Walk the input tree and group query files by folder
//! 3. **Packing** - Parse each file's comment header and body, assemble the
//!    folder's pack and validate it
//! 4. **Writing** - Serialize each pack as YAML or JSON into the output directory
//! 5. **Reporting** - Summary of packs generated and queries processed
//!
//! ## Pack shape
//!
//! A folder with one valid query becomes a single-query pack (`query` key,
//! description taken from the query's comment header when present). A folder
//! with two or more becomes a multi-query pack (`queries` list in file name
//! order). Folders without a valid query produce no pack.
//!
//! ## Configuration
//!
//! Configuration follows hierarchical precedence:
//! 1. User config (~/.config/sentinel-packs/config.toml)
//! 2. Git root (sentinel-packs.toml)
//! 3. Current directory (sentinel-packs.toml)
//! 4. Explicit --config path
//! 5. Environment variables (SENTINEL_PACKS_*)
//! 6. CLI flags (highest precedence)

pub mod cli;
pub mod generator;
pub mod output;
pub mod packer;
pub mod utils;

use anyhow::{Context, Result};
use generator::assemble_pack;
use output::{OutputResult, WriteOptions};
use packer::{ParsedQuery, QueryFolder, ScanOptions};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use utils::dry_run::{PlannedPack, display_dry_run_summary};
use utils::error::PackError;
use utils::progress::{ProgressManager, stages};
use utils::summary::display_success_summary;

/// Final resolved configuration after merging all sources (CLI, env, config files).
#[derive(Debug, Clone)]
pub struct MergedConfig {
    /// Root of the query corpus
    pub input: PathBuf,
    /// Directory pack files are written to
    pub output: PathBuf,
    /// Output format (`yaml` or `json`)
    pub format: String,
    /// Author recorded in every pack
    pub author: String,
    /// Query file extension, without the leading dot
    pub extension: String,
    /// Pack name for queries directly under the input root
    pub root_label: String,
    /// Folder label substrings to skip
    pub exclude: Vec<String>,
    /// Show the plan without writing
    pub dry_run: bool,
    /// Validate packs without writing
    pub validate_only: bool,
    /// Verbosity level (0-2)
    pub verbose: u8,
    /// Quiet mode (suppress summary and progress)
    pub quiet: bool,
}

impl MergedConfig {
    fn scan_options(&self) -> ScanOptions {
        ScanOptions::new(&self.extension)
            .with_exclude(self.exclude.clone())
            .with_root_label(self.root_label.clone())
    }

    fn write_options(&self) -> WriteOptions {
        WriteOptions::new(&self.output).with_format(self.format.clone())
    }

    fn writes_files(&self) -> bool {
        !self.dry_run && !self.validate_only
    }
}

/// Tracks the current stage of pipeline execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Configuration validation and input path check
    Init,
    /// Directory walk and folder grouping
    Scanning,
    /// Header parsing, pack assembly and validation
    Packing,
    /// Pack serialization to disk
    Writing,
    /// Summary output
    Reporting,
    /// Pipeline completed successfully
    Complete,
}

/// PipelineContext carries state through all pipeline stages.
#[derive(Debug)]
pub struct PipelineContext {
    /// Final resolved configuration from all sources
    pub config: MergedConfig,
    /// Current pipeline execution stage
    pub stage: PipelineStage,
}

impl PipelineContext {
    pub fn new(config: MergedConfig) -> Self {
        Self {
            config,
            stage: PipelineStage::Init,
        }
    }

    /// Update the current pipeline stage
    pub fn set_stage(&mut self, stage: PipelineStage) {
        tracing::debug!("Pipeline stage: {:?}", stage);
        self.stage = stage;
    }
}

/// Counters and outputs of a completed run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Packs written (or that would be written in dry-run/validate-only mode)
    pub packs_generated: usize,
    /// Valid queries included in packs
    pub queries_processed: usize,
    /// Query files skipped because they could not be read or had no body
    pub files_skipped: usize,
    /// Folders that produced no pack (no valid query, or no usable file name)
    pub empty_folders: usize,
    /// Directory the packs were written to
    pub output_dir: PathBuf,
    /// One entry per written pack file
    pub outputs: Vec<OutputResult>,
    /// Whether pack files were written
    pub written: bool,
    /// Wall time of the run
    pub elapsed: Duration,
}

/// Valid queries of one folder plus the number of files that were skipped.
#[derive(Debug, Clone, Default)]
pub struct FolderQueries {
    pub queries: Vec<ParsedQuery>,
    pub skipped: usize,
}

/// Initialize tracing for the binary.
///
/// `-q` shows warnings only, `-v` debug, `-vv` trace. `RUST_LOG` takes
/// precedence when set. Calling this twice is harmless.
pub fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}

/// Read and parse every query file of a folder, in order.
///
/// Unreadable files, files with an empty body and files whose name is only
/// the extension are skipped with a warning; they never abort the folder.
pub fn collect_folder_queries(folder: &QueryFolder, extension: &str) -> FolderQueries {
    let mut result = FolderQueries::default();

    for path in &folder.files {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        match packer::parse_query_file(path, extension) {
            Ok(query) if query.name.trim().is_empty() => {
                tracing::warn!("No query name can be derived from {}, skipping", file_name);
                result.skipped += 1;
            }
            Ok(query) if query.is_empty() => {
                tracing::warn!("Empty query in {}, skipping", file_name);
                result.skipped += 1;
            }
            Ok(query) => result.queries.push(query),
            Err(e) => {
                tracing::warn!("Error processing {}: {}", file_name, e);
                result.skipped += 1;
            }
        }
    }

    result
}

/// Run the pipeline over `config.input`.
///
/// Only a missing input path or a failed write stop the run. Problems with
/// individual query files are logged and skipped, and a folder whose pack
/// fails validation is skipped like one without a usable file name.
pub fn run(config: MergedConfig) -> Result<RunSummary> {
    let started = Instant::now();

    tracing::debug!(
        "Configuration: input={}, output={}, format={}, extension={}, exclude={:?}",
        config.input.display(),
        config.output.display(),
        config.format,
        config.extension,
        config.exclude
    );

    let mut ctx = PipelineContext::new(config);

    // Stage 1: Init
    ctx.set_stage(PipelineStage::Init);
    if !ctx.config.input.exists() {
        return Err(PackError::input_not_found(&ctx.config.input))
            .context("Failed to validate input path");
    }
    tracing::info!("Query corpus: {}", ctx.config.input.display());
    tracing::info!("Output directory: {}", ctx.config.output.display());

    let mut progress = if ctx.config.quiet || ctx.config.verbose > 0 {
        ProgressManager::hidden()
    } else {
        ProgressManager::new()
    };

    // Stage 2: Scanning
    ctx.set_stage(PipelineStage::Scanning);
    let _scanning = progress.add_stage(stages::SCANNING, 0);
    let folders = match packer::scan_folders(&ctx.config.input, &ctx.config.scan_options()) {
        Ok(folders) => folders,
        Err(e) => {
            progress.abandon(stages::SCANNING);
            return Err(e).context("Failed to scan query corpus");
        }
    };
    progress.finish(
        stages::SCANNING,
        &format!("Found {} folders with query files", folders.len()),
    );

    // Stage 3: Packing
    ctx.set_stage(PipelineStage::Packing);
    let write_options = ctx.config.write_options();
    let mut summary = RunSummary {
        output_dir: ctx.config.output.clone(),
        written: ctx.config.writes_files(),
        ..RunSummary::default()
    };
    let mut planned: Vec<PlannedPack> = Vec::new();

    let _packing = progress.add_stage(stages::PACKING, folders.len() as u64);
    for (i, folder) in folders.iter().enumerate() {
        progress.update(stages::PACKING, i as u64, &folder.label);
        tracing::info!(
            "Processing folder: {} ({} queries)",
            folder.label,
            folder.files.len()
        );

        let FolderQueries { queries, skipped } =
            collect_folder_queries(folder, &ctx.config.extension);
        summary.files_skipped += skipped;
        let query_count = queries.len();

        let Some(pack) = assemble_pack(&folder.label, queries, &ctx.config.author) else {
            tracing::info!("No valid queries found in {}", folder.label);
            summary.empty_folders += 1;
            continue;
        };

        let path = match pack
            .validate()
            .and_then(|()| output::writer::output_path(&pack, &write_options))
        {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("Skipping folder {}: {}", folder.label, e);
                summary.empty_folders += 1;
                continue;
            }
        };

        summary.packs_generated += 1;
        summary.queries_processed += query_count;
        planned.push(PlannedPack { pack, path });
    }
    progress.finish(
        stages::PACKING,
        &format!("Assembled {} packs", summary.packs_generated),
    );

    warn_on_collisions(&planned);

    // Stage 4: Writing
    ctx.set_stage(PipelineStage::Writing);
    if ctx.config.writes_files() {
        std::fs::create_dir_all(&ctx.config.output)
            .map_err(PackError::from)
            .with_context(|| {
                format!(
                    "Failed to create output directory {}",
                    ctx.config.output.display()
                )
            })?;

        for plan in &planned {
            let result = output::write_pack(&plan.pack, &write_options)
                .with_context(|| format!("Failed to write pack '{}'", plan.pack.name))?;
            tracing::info!("Generated: {}", result.path.display());
            summary.outputs.push(result);
        }
    }

    // Stage 5: Reporting
    ctx.set_stage(PipelineStage::Reporting);
    summary.elapsed = started.elapsed();
    tracing::info!(
        "Packs generated: {}, queries processed: {}",
        summary.packs_generated,
        summary.queries_processed
    );

    if ctx.config.dry_run {
        if !ctx.config.quiet {
            display_dry_run_summary(&planned, &ctx.config)?;
        }
    } else {
        display_success_summary(&summary, ctx.config.quiet)?;
    }

    ctx.set_stage(PipelineStage::Complete);
    Ok(summary)
}

/// Warn when two folders sanitize to the same pack file; the later one wins.
fn warn_on_collisions(planned: &[PlannedPack]) {
    let mut seen: HashMap<&PathBuf, &str> = HashMap::new();
    for plan in planned {
        if let Some(previous) = seen.insert(&plan.path, plan.pack.name.as_str()) {
            tracing::warn!(
                "Pack '{}' overwrites pack '{}' at {}",
                plan.pack.name,
                previous,
                plan.path.display()
            );
        }
    }
}
