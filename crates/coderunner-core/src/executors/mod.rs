//! In-container execution through `docker exec` sessions.
//!
//! Each request opens two sessions against the selected container: one that
//! writes the code payload to the container filesystem, and one that runs the
//! image's entrypoint script with stdout and stderr captured. The commands
//! come from an [`ExecBackend`] so the subprocess plumbing can be exercised
//! without a Docker daemon.

use crate::config::RunnerConfig;
use tokio::process::Command;

pub mod classifier;
pub mod collector;
pub mod injector;

pub use classifier::{classify, ExecutionResult, FailureKind};
pub use collector::{run_entrypoint, CollectedOutput, OutputLine, StreamKind};
pub use injector::inject_code;

/// Builds the subprocess commands for one container.
pub trait ExecBackend: Send + Sync {
    /// A command that copies its stdin into the container's input file.
    fn inject_command(&self, container_id: &str) -> Command;

    /// A command that runs the entrypoint script inside the container.
    fn entrypoint_command(&self, container_id: &str) -> Command;
}

/// [`ExecBackend`] shelling out to the `docker` CLI.
#[derive(Debug, Clone)]
pub struct DockerCli {
    docker_binary: String,
    input_path: String,
    entrypoint: String,
}

impl DockerCli {
    pub fn new(
        docker_binary: impl Into<String>,
        input_path: impl Into<String>,
        entrypoint: impl Into<String>,
    ) -> Self {
        Self {
            docker_binary: docker_binary.into(),
            input_path: input_path.into(),
            entrypoint: entrypoint.into(),
        }
    }

    pub fn from_config(config: &RunnerConfig) -> Self {
        Self::new(&config.docker_binary, &config.input_path, &config.entrypoint)
    }

    fn inject_args(&self, container_id: &str) -> Vec<String> {
        vec![
            "exec".to_string(),
            "-i".to_string(),
            container_id.to_string(),
            "sh".to_string(),
            "-c".to_string(),
            format!("cat > {}", self.input_path),
        ]
    }

    fn entrypoint_args(&self, container_id: &str) -> Vec<String> {
        vec![
            "exec".to_string(),
            container_id.to_string(),
            self.entrypoint.clone(),
        ]
    }
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::from_config(&RunnerConfig::default())
    }
}

impl ExecBackend for DockerCli {
    fn inject_command(&self, container_id: &str) -> Command {
        let mut cmd = Command::new(&self.docker_binary);
        cmd.args(self.inject_args(container_id));
        cmd
    }

    fn entrypoint_command(&self, container_id: &str) -> Command {
        let mut cmd = Command::new(&self.docker_binary);
        cmd.args(self.entrypoint_args(container_id));
        cmd
    }
}
