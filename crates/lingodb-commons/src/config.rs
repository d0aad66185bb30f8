//! Localization configuration block.
//!
//! Deserialized from the `[localization]` section of the server's
//! `config.toml`; every field has a default so a missing section yields a
//! working configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the resource store and its services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalizationConfig {
    /// Logical table (storage partition) holding resource rows.
    #[serde(default = "default_resource_table")]
    pub resource_table: String,

    /// When true, a resolution miss on the invariant locale writes a new
    /// invariant row whose value is the resource id itself.
    #[serde(default)]
    pub add_missing_resources: bool,

    /// Gates create-table / backup / restore. Disabled deployments get a
    /// permission-denied error from those operations.
    #[serde(default = "default_true")]
    pub allow_schema_operations: bool,

    /// Base directory for resx export/import.
    #[serde(default = "default_resx_folder")]
    pub resx_base_folder: String,

    /// Google Cloud Translation API key (`googleapi` service).
    #[serde(default)]
    pub google_api_key: Option<String>,

    /// Azure/Bing Translator credentials (`bing` service).
    #[serde(default)]
    pub bing_client_id: Option<String>,
    #[serde(default)]
    pub bing_client_secret: Option<String>,

    /// Timeout for outbound translation calls, in seconds.
    #[serde(default = "default_translator_timeout")]
    pub translator_timeout_secs: u64,
}

impl Default for LocalizationConfig {
    fn default() -> Self {
        Self {
            resource_table: default_resource_table(),
            add_missing_resources: false,
            allow_schema_operations: true,
            resx_base_folder: default_resx_folder(),
            google_api_key: None,
            bing_client_id: None,
            bing_client_secret: None,
            translator_timeout_secs: default_translator_timeout(),
        }
    }
}

fn default_resource_table() -> String {
    "localizations".to_string()
}

fn default_resx_folder() -> String {
    "./resources".to_string()
}

fn default_translator_timeout() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LocalizationConfig::default();
        assert_eq!(config.resource_table, "localizations");
        assert!(!config.add_missing_resources);
        assert!(config.allow_schema_operations);
        assert_eq!(config.translator_timeout_secs, 10);
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let config: LocalizationConfig =
            serde_json::from_str(r#"{"add_missing_resources": true}"#).unwrap();
        assert!(config.add_missing_resources);
        assert_eq!(config.resource_table, "localizations");
    }
}
