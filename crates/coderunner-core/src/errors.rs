//! Error types for the container execution pipeline
//!
//! Failures fall into two families. Transport errors come from the container
//! runtime or from the `docker exec` subprocesses and are returned to the
//! caller untouched. Classifier errors are derived from the captured output
//! text itself and are the only errors a well-behaved entrypoint produces.

use std::process::ExitStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Bollard (Docker client) error: {0}")]
    Docker(#[from] bollard::errors::Error),
    #[error("Container runtime error: {0}")]
    Runtime(String),
    #[error("I/O error during container operation: {0}")]
    Io(#[from] std::io::Error),
    #[error("Subprocess {0} pipe was not attached")]
    MissingPipe(&'static str),
    #[error("Code injection into container {container_id} failed ({status}): {stderr}")]
    InjectionFailed {
        container_id: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("Failed to pull image '{image}': {message}")]
    PullFailed { image: String, message: String },
    #[error("Output reader task failed: {0}")]
    ReaderPanicked(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("error: No output")]
    NoOutput,
    #[error("{0}")]
    Execution(String),
}

/// Coarse category of a [`RunnerError`], for callers that only need to decide
/// how to report a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    NoOutput,
    ExecutionError,
    Config,
}

impl RunnerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RunnerError::NoOutput => ErrorKind::NoOutput,
            RunnerError::Execution(_) => ErrorKind::ExecutionError,
            RunnerError::ConfigError(_) => ErrorKind::Config,
            _ => ErrorKind::Transport,
        }
    }
}

impl From<tokio::task::JoinError> for RunnerError {
    fn from(err: tokio::task::JoinError) -> Self {
        RunnerError::ReaderPanicked(err.to_string())
    }
}
