use crate::generator::QueryPack;
use crate::output::OutputFormatter;
use crate::utils::error::PackError;

pub struct YamlFormatter;

impl OutputFormatter for YamlFormatter {
    fn format(&self, pack: &QueryPack) -> Result<String, PackError> {
        serde_yaml::to_string(pack).map_err(|e| PackError::Serialize {
            format: "yaml".to_string(),
            message: e.to_string(),
        })
    }

    fn extension(&self) -> &str {
        "yaml"
    }
}
