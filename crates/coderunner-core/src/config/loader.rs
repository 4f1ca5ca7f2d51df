//! Configuration loader for YAML files and environment overrides

use crate::config::types::*;
use crate::errors::RunnerError;
use std::env;
use std::path::Path;
use tokio::fs;

pub const ENV_DOCKER_BINARY: &str = "CODERUNNER_DOCKER_BINARY";
pub const ENV_ENTRYPOINT: &str = "CODERUNNER_ENTRYPOINT";
pub const ENV_INPUT_PATH: &str = "CODERUNNER_INPUT_PATH";
pub const ENV_POLL_INTERVAL_MS: &str = "CODERUNNER_POLL_INTERVAL_MS";

pub struct ConfigLoader;
impl ConfigLoader {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<RunnerConfig, RunnerError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path).await.map_err(|e| {
            RunnerError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_str(&content)
    }

    /// Load configuration from a YAML string. Environment overrides are
    /// applied before validation.
    pub fn from_str(content: &str) -> Result<RunnerConfig, RunnerError> {
        let mut config: RunnerConfig = if content.trim().is_empty() {
            RunnerConfig::default()
        } else {
            serde_yaml::from_str(content)
                .map_err(|e| RunnerError::ConfigError(format!("Failed to parse YAML config: {}", e)))?
        };

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Defaults plus environment overrides, for running without a file.
    pub fn from_env() -> Result<RunnerConfig, RunnerError> {
        let mut config = RunnerConfig::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }
}

impl RunnerConfig {
    pub fn apply_env_overrides(&mut self) -> Result<(), RunnerError> {
        if let Ok(value) = env::var(ENV_DOCKER_BINARY) {
            self.docker_binary = value;
        }
        if let Ok(value) = env::var(ENV_ENTRYPOINT) {
            self.entrypoint = value;
        }
        if let Ok(value) = env::var(ENV_INPUT_PATH) {
            self.input_path = value;
        }
        if let Ok(value) = env::var(ENV_POLL_INTERVAL_MS) {
            self.poll_interval_ms = value.trim().parse().map_err(|e| {
                RunnerError::ConfigError(format!(
                    "Invalid {} value '{}': {}",
                    ENV_POLL_INTERVAL_MS, value, e
                ))
            })?;
        }
        Ok(())
    }
}
