//! Configuration loader for YAML files
//!
//! Loads and validates [`MemoryConfig`] from YAML. Parsing and bounds
//! violations both surface as `ConfigError` so callers have a single failure
//! mode at startup.

use crate::config::MemoryConfig;
use crate::errors::ConvoyError;
use std::path::Path;
use tokio::fs;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file.
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<MemoryConfig, ConvoyError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await.map_err(|e| {
            ConvoyError::ConfigError(format!(
                "failed to read configuration file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_str(&content)
    }

    /// Parse configuration from a YAML string and validate it.
    pub fn from_str(content: &str) -> Result<MemoryConfig, ConvoyError> {
        let config: MemoryConfig = serde_yaml::from_str(content)
            .map_err(|e| ConvoyError::ConfigError(format!("failed to parse configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn parses_partial_yaml_with_defaults() {
        let config = ConfigLoader::from_str("summary_threshold: 6\nkeep_recent: 2\n").unwrap();
        assert_eq!(config.summary_threshold, 6);
        assert_eq!(config.keep_recent, 2);
        assert_eq!(config.max_tokens, 4000);
        assert!(config.remote_url.is_none());
    }

    #[test]
    fn empty_document_yields_defaults() {
        let config = ConfigLoader::from_str("{}").unwrap();
        assert_eq!(config.kv_prefix, "chat:");
    }

    #[test]
    fn invalid_bounds_are_rejected() {
        let err = ConfigLoader::from_str("summary_threshold: 1\n").unwrap_err();
        assert!(matches!(err, ConvoyError::ConfigError(_)));
    }

    #[tokio::test]
    async fn loads_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "max_tokens: 2048").unwrap();
        writeln!(file, "remote_url: redis://127.0.0.1:6379").unwrap();

        let config = ConfigLoader::from_file(file.path()).await.unwrap();
        assert_eq!(config.max_tokens, 2048);
        assert_eq!(
            config.remote_url.as_deref(),
            Some("redis://127.0.0.1:6379")
        );
    }

    #[tokio::test]
    async fn missing_file_is_a_config_error() {
        let err = ConfigLoader::from_file("/nonexistent/convoy.yaml")
            .await
            .unwrap_err();
        assert!(matches!(err, ConvoyError::ConfigError(_)));
    }
}
