// Copyright (c) 2025-2026 the sentinel-packs contributors
// SPDX-License-Identifier: Apache-2.0

use crate::output::FORMATS;
use console::style;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Repository error: {0}")]
    Repository(#[from] git2::Error),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("Input path not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("Failed to read query file {}: {message}", path.display())]
    QueryFile { path: PathBuf, message: String },

    #[error("Failed to serialize pack as {format}: {message}")]
    Serialize { format: String, message: String },

    #[error("Output error: {0}")]
    Output(String),

    #[error("Validation error: {message}\nSuggestion: {suggestion}")]
    ValidationError { message: String, suggestion: String },
}

impl PackError {
    pub fn input_not_found(path: impl Into<PathBuf>) -> Self {
        PackError::InputNotFound { path: path.into() }
    }

    pub fn invalid_format(format: &str) -> Self {
        PackError::ValidationError {
            message: format!("Invalid output format: '{}'", format),
            suggestion: format!("Valid formats are: {}", FORMATS.join(", ")),
        }
    }

    pub fn invalid_pack(pack: &str, message: impl Into<String>) -> Self {
        PackError::ValidationError {
            message: format!("Pack '{}' is invalid: {}", pack, message.into()),
            suggestion: "Check the query files in this folder for duplicate or empty entries"
                .to_string(),
        }
    }

    /// Short hint shown under the error message, if one applies.
    fn hint(&self) -> Option<String> {
        match self {
            PackError::InputNotFound { .. } => Some(
                "Pass the query corpus path as the first argument, or set [general] input in sentinel-packs.toml"
                    .to_string(),
            ),
            PackError::Config(_) => {
                Some("Check sentinel-packs.toml and SENTINEL_PACKS_* variables".to_string())
            }
            PackError::FileSystem(err) if err.kind() == std::io::ErrorKind::PermissionDenied => {
                Some("Check permissions on the output directory".to_string())
            }
            PackError::Repository(_)
            | PackError::FileSystem(_)
            | PackError::QueryFile { .. }
            | PackError::Serialize { .. }
            | PackError::Output(_)
            | PackError::ValidationError { .. } => None,
        }
    }
}

impl From<toml::de::Error> for PackError {
    fn from(err: toml::de::Error) -> Self {
        PackError::Config(format!("Invalid TOML: {}", err.message()))
    }
}

/// Render an error for the terminal.
///
/// In verbose mode the `Debug` representation is appended, which includes
/// the underlying source errors.
pub fn format_error(error: &PackError, verbose: bool) -> String {
    let mut out = format!("\n{} {}", style("\u{26a0} Error:").red().bold(), error);

    if let Some(hint) = error.hint() {
        out.push_str(&format!("\n\n{} {}", style("Hint:").yellow(), hint));
    }

    if verbose {
        out.push_str(&format!("\n\nDetails: {:?}", error));
    }

    out
}
