pub mod header;
pub mod sanitize;
pub mod walker;

use crate::utils::error::PackError;
use std::path::Path;

pub use header::{QueryHeader, parse_header};
pub use sanitize::sanitize_pack_name;
pub use walker::{QueryFolder, ScanOptions, scan_folders};

/// One query extracted from a query file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    /// File name with the query extension stripped
    pub name: String,
    /// Text of the leading comment block, if any
    pub description: Option<String>,
    /// Query text, trimmed; may be empty and is rejected by the caller then
    pub body: String,
}

impl ParsedQuery {
    /// Build a query from a file name and its raw text.
    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        let QueryHeader { description, body } = parse_header(text);
        Self {
            name: name.into(),
            description,
            body,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Derive a query name from its file name by stripping `.{extension}`.
pub fn query_name(path: &Path, extension: &str) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = format!(".{}", extension.trim_start_matches('.'));
    match file_name.strip_suffix(&suffix) {
        Some(stem) => stem.to_string(),
        None => file_name,
    }
}

/// Read and parse a single query file.
///
/// I/O and UTF-8 decoding failures are reported as [`PackError::QueryFile`]
/// so the caller can skip the file and keep going.
pub fn parse_query_file(path: &Path, extension: &str) -> Result<ParsedQuery, PackError> {
    let text = std::fs::read_to_string(path).map_err(|e| PackError::QueryFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(ParsedQuery::from_text(query_name(path, extension), &text))
}
