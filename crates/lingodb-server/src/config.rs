// Configuration module
use lingodb_commons::LocalizationConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main server configuration, loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub localization: LocalizationConfig,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// 0 means one worker per CPU core.
    #[serde(default)]
    pub workers: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
        }
    }
}

/// Storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Backend kind; only `memory` ships today, the trait is the seam for
    /// database-backed deployments.
    #[serde(default = "default_backend")]
    pub backend: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: default_backend(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_file")]
    pub file_path: String,
    #[serde(default = "default_true")]
    pub log_to_console: bool,
    /// `compact` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Per-target level overrides, e.g. `lingodb_store = "debug"`.
    #[serde(default)]
    pub target_levels: Option<HashMap<String, String>>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_path: default_log_file(),
            log_to_console: true,
            format: default_log_format(),
            target_levels: None,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: ServerConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8040
}

fn default_backend() -> String {
    "memory".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/lingodb.log".to_string()
}

fn default_log_format() -> String {
    "compact".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8040);
        assert_eq!(config.storage.backend, "memory");
        assert_eq!(config.localization.resource_table, "localizations");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: ServerConfig = toml::from_str(
            r#"
            [server]
            port = 9000

            [localization]
            add_missing_resources = true
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(config.localization.add_missing_resources);
        assert!(config.logging.log_to_console);
    }
}
