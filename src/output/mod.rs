pub mod json;
pub mod writer;
pub mod yaml;

use crate::generator::QueryPack;
use crate::utils::error::PackError;

pub use writer::{OutputResult, WriteOptions, pack_file_name, write_pack};

/// Output formats a pack can be written in.
pub const FORMATS: &[&str] = &["yaml", "json"];

pub trait OutputFormatter {
    fn format(&self, pack: &QueryPack) -> Result<String, PackError>;
    fn extension(&self) -> &str;
}

/// Look up the formatter for a format name (case-insensitive).
pub fn get_formatter(format: &str) -> Result<Box<dyn OutputFormatter>, PackError> {
    match format.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(Box::new(yaml::YamlFormatter)),
        "json" => Ok(Box::new(json::JsonFormatter)),
        _ => Err(PackError::invalid_format(format)),
    }
}
