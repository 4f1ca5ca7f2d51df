//! Configuration type definitions

use serde::{Deserialize, Serialize};
use std::time::Duration;
use crate::errors::RunnerError;

pub const DEFAULT_DOCKER_BINARY: &str = "docker";
pub const DEFAULT_INPUT_PATH: &str = "/input.txt";
pub const DEFAULT_ENTRYPOINT: &str = "/source/script.sh";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// `docker` executable used for the exec sessions.
    #[serde(default = "default_docker_binary")]
    pub docker_binary: String,
    /// Where the code payload is written inside the container.
    #[serde(default = "default_input_path")]
    pub input_path: String,
    /// Script run inside the container to execute the payload.
    #[serde(default = "default_entrypoint")]
    pub entrypoint: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default)]
    pub include_stopped_containers: bool,
    #[serde(default = "default_true")]
    pub serialize_container_acquisition: bool,
    /// Docker endpoint; `None` means `DOCKER_HOST` or the local socket.
    #[serde(default)]
    pub docker_host: Option<String>,
}

fn default_docker_binary() -> String {
    DEFAULT_DOCKER_BINARY.to_string()
}

fn default_input_path() -> String {
    DEFAULT_INPUT_PATH.to_string()
}

fn default_entrypoint() -> String {
    DEFAULT_ENTRYPOINT.to_string()
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_true() -> bool {
    true
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            docker_binary: default_docker_binary(),
            input_path: default_input_path(),
            entrypoint: default_entrypoint(),
            poll_interval_ms: default_poll_interval_ms(),
            include_stopped_containers: false,
            serialize_container_acquisition: true,
            docker_host: None,
        }
    }
}

impl RunnerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn validate(&self) -> Result<(), RunnerError> {
        if self.docker_binary.trim().is_empty() {
            return Err(RunnerError::ConfigError("docker_binary cannot be empty".to_string()));
        }

        if self.input_path.trim().is_empty() {
            return Err(RunnerError::ConfigError("input_path cannot be empty".to_string()));
        }

        if self.entrypoint.trim().is_empty() {
            return Err(RunnerError::ConfigError("entrypoint cannot be empty".to_string()));
        }

        if self.poll_interval_ms == 0 {
            return Err(RunnerError::ConfigError(
                "poll_interval_ms must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
