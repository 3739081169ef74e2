use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Run-level options for one conversion.
///
/// Loadable from a JSON config file or assembled from CLI flags; the config
/// file wins when both are given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertOptions {
    pub stack_name: String,
    #[serde(default)]
    pub service_name: String,
    /// Consumed by the discovery phase, not by code generation.
    #[serde(default)]
    pub region: String,
    /// Rendered verbatim into every resource's tag block.
    #[serde(default)]
    pub additional_tags: BTreeMap<String, String>,
}

impl ConvertOptions {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file: {}", path.display()))?;

        let options: ConvertOptions =
            serde_json::from_str(&content).context("unable to parse convert config")?;
        Ok(options.normalized())
    }

    /// Apply defaults: the service name falls back to the stack name.
    pub fn normalized(mut self) -> Self {
        if self.service_name.is_empty() {
            self.service_name = self.stack_name.clone();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_name_defaults_to_stack_name() {
        let options = ConvertOptions {
            stack_name: "orders-prod".to_string(),
            service_name: String::new(),
            region: String::new(),
            additional_tags: BTreeMap::new(),
        }
        .normalized();

        assert_eq!(options.service_name, "orders-prod");
    }

    #[test]
    fn test_explicit_service_name_kept() {
        let options = ConvertOptions {
            stack_name: "orders-prod".to_string(),
            service_name: "orders".to_string(),
            region: String::new(),
            additional_tags: BTreeMap::new(),
        }
        .normalized();

        assert_eq!(options.service_name, "orders");
    }

    #[test]
    fn test_from_json() {
        let options: ConvertOptions = serde_json::from_str(
            r#"{
                "stack_name": "orders-prod",
                "additional_tags": {"Team": "payments"}
            }"#,
        )
        .unwrap();
        let options = options.normalized();

        assert_eq!(options.stack_name, "orders-prod");
        assert_eq!(options.service_name, "orders-prod");
        assert_eq!(options.additional_tags["Team"], "payments");
    }
}
