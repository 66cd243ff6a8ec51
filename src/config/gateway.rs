//! Gateway configuration parsing
//!
//! Loads the gateway settings from YAML and layers environment
//! overrides on top, so deployments can keep secrets out of the file.

use serde::Deserialize;
use thiserror::Error;

/// Default configuration path
pub const DEFAULT_CONFIG_PATH: &str = "config/gateway.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Root configuration structure for the gateway
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Path of the host field schema used by the filter compiler
    #[serde(default = "default_schema_path")]
    pub schema_path: String,
    pub elasticsearch: ElasticsearchConfig,
}

/// Connection settings for the search engine
#[derive(Debug, Clone, Deserialize)]
pub struct ElasticsearchConfig {
    pub url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub index: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_port() -> u16 {
    4000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_schema_path() -> String {
    "config/host_schema.yaml".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl ElasticsearchConfig {
    /// Basic-auth credentials, only when both parts are set
    pub fn credentials(&self) -> Option<(&str, &str)> {
        if self.username.is_empty() || self.password.is_empty() {
            None
        } else {
            Some((&self.username, &self.password))
        }
    }
}

impl GatewayConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: GatewayConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup`, keyed by environment variable name
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = lookup("ELASTICSEARCH_URL") {
            self.elasticsearch.url = url;
        }
        if let Some(username) = lookup("ELASTICSEARCH_USERNAME") {
            self.elasticsearch.username = username;
        }
        if let Some(password) = lookup("ELASTICSEARCH_PASSWORD") {
            self.elasticsearch.password = password;
        }
        if let Some(index) = lookup("ELASTICSEARCH_INDEX") {
            self.elasticsearch.index = index;
        }
        if let Some(port) = lookup("PORT") {
            self.port = port
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("PORT must be a port number, got {port:?}")))?;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.log_level = level;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const YAML: &str = r#"
port: 4001
log_level: debug
elasticsearch:
  url: "http://localhost:9200"
  index: "xjoin.inventory.hosts"
"#;

    #[test]
    fn test_parse_config() {
        let config = GatewayConfig::from_yaml(YAML).unwrap();
        assert_eq!(config.port, 4001);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.schema_path, "config/host_schema.yaml");
        assert_eq!(config.elasticsearch.index, "xjoin.inventory.hosts");
        assert_eq!(config.elasticsearch.timeout_secs, 30);
        assert!(config.elasticsearch.credentials().is_none());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("ELASTICSEARCH_URL", "http://es:9200"),
            ("ELASTICSEARCH_USERNAME", "xjoin"),
            ("ELASTICSEARCH_PASSWORD", "secret"),
            ("PORT", "8080"),
        ]
        .into_iter()
        .collect();

        let config = GatewayConfig::from_yaml(YAML)
            .unwrap()
            .with_overrides(|name| env.get(name).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.elasticsearch.url, "http://es:9200");
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.elasticsearch.credentials(),
            Some(("xjoin", "secret"))
        );
    }

    #[test]
    fn test_credentials_need_both_parts() {
        let mut config = GatewayConfig::from_yaml(YAML).unwrap().elasticsearch;
        config.username = "xjoin".into();
        assert!(config.credentials().is_none());
    }

    #[test]
    fn test_bad_port_override() {
        let result = GatewayConfig::from_yaml(YAML)
            .unwrap()
            .with_overrides(|name| (name == "PORT").then(|| "http".to_string()));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = GatewayConfig::from_file("does/not/exist.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
