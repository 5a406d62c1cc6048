//! File writing for generated packs.
//!
//! Each pack lands in the output directory as `<sanitized name>.<ext>`.
//! Existing files are overwritten: a run always regenerates the full set.

use crate::generator::QueryPack;
use crate::output::get_formatter;
use crate::packer::sanitize_pack_name;
use crate::utils::error::PackError;
use std::path::PathBuf;

/// Options for controlling pack file writing.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Directory the pack files are written to
    pub output_dir: PathBuf,
    /// Output format name (`yaml` or `json`)
    pub format: String,
}

impl WriteOptions {
    /// Create new write options writing YAML into `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            format: "yaml".to_string(),
        }
    }

    /// Set the output format.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }
}

/// Result of writing a pack file.
#[derive(Debug, Clone)]
pub struct OutputResult {
    /// Name of the pack that was written
    pub pack_name: String,
    /// Path where the file was written
    pub path: PathBuf,
    /// Number of queries in the pack
    pub query_count: usize,
    /// Whether the file was newly created (vs overwritten)
    pub is_new: bool,
}

/// File name for a pack, or `None` if the label has no filename-safe characters.
pub fn pack_file_name(label: &str, extension: &str) -> Option<String> {
    let stem = sanitize_pack_name(label);
    if stem.is_empty() {
        None
    } else {
        Some(format!("{}.{}", stem, extension))
    }
}

/// Target path for a pack under the given options.
pub fn output_path(pack: &QueryPack, options: &WriteOptions) -> Result<PathBuf, PackError> {
    let formatter = get_formatter(&options.format)?;
    let file_name = pack_file_name(&pack.name, formatter.extension()).ok_or_else(|| {
        PackError::Output(format!(
            "Pack name '{}' has no characters usable in a file name",
            pack.name
        ))
    })?;
    Ok(options.output_dir.join(file_name))
}

/// Serialize and write a single pack.
pub fn write_pack(pack: &QueryPack, options: &WriteOptions) -> Result<OutputResult, PackError> {
    let formatter = get_formatter(&options.format)?;
    let content = formatter.format(pack)?;
    let path = output_path(pack, options)?;

    let is_new = !path.exists();

    if !options.output_dir.exists() {
        std::fs::create_dir_all(&options.output_dir).map_err(|e| {
            PackError::Output(format!(
                "Failed to create directory {}: {}",
                options.output_dir.display(),
                e
            ))
        })?;
    }

    std::fs::write(&path, content)
        .map_err(|e| PackError::Output(format!("Failed to write {}: {}", path.display(), e)))?;

    tracing::debug!("Wrote pack '{}' to {}", pack.name, path.display());

    Ok(OutputResult {
        pack_name: pack.name.clone(),
        path,
        query_count: pack.query_count(),
        is_new,
    })
}
