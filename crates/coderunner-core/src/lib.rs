//! Execution core for a remote code runner.
//!
//! A caller names a container image and hands over a code payload. The core
//! makes sure the image and a running container exist, writes the payload
//! into the container, runs the image's entrypoint script and returns its
//! combined stdout/stderr, or a classified error.
//!
//! # Architecture Overview
//!
//! - **Runtime seam**: [`runtime::ContainerRuntime`], implemented over the
//!   Docker Engine API by [`runtime::DockerRuntime`]
//! - **Acquisition**: image availability, pulling and container lookup or
//!   creation in [`provisioning`]
//! - **Execution**: code injection, entrypoint execution with concurrent
//!   stream capture, and output classification in [`executors`]
//! - **Orchestration**: [`CodeRunner`] sequences the stages for one request
//! - **Configuration**: YAML plus environment overrides in [`config`]

pub mod config;
pub mod errors;
pub mod executors;
pub mod image;
pub mod locks;
pub mod provisioning;
pub mod runner;
pub mod runtime;

pub use config::{ConfigLoader, RunnerConfig};
pub use errors::{ErrorKind, RunnerError};
pub use executors::{ExecBackend, ExecutionResult, FailureKind};
pub use runner::{CodeRunner, ExecutionRequest};
pub use runtime::{ContainerRuntime, DockerRuntime};

#[cfg(test)]
pub mod test_utils;
