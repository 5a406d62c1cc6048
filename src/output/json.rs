use crate::generator::QueryPack;
use crate::output::OutputFormatter;
use crate::utils::error::PackError;

pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format(&self, pack: &QueryPack) -> Result<String, PackError> {
        let mut out = serde_json::to_string_pretty(pack).map_err(|e| PackError::Serialize {
            format: "json".to_string(),
            message: e.to_string(),
        })?;
        out.push('\n');
        Ok(out)
    }

    fn extension(&self) -> &str {
        "json"
    }
}
