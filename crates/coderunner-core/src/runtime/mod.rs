//! Container runtime abstraction
//!
//! The execution pipeline never talks to a Docker client directly. It goes
//! through [`ContainerRuntime`], which is constructed by the caller and passed
//! in, so the whole acquisition sequence can be driven against a fake runtime
//! in tests. Results are reduced to the handful of fields the pipeline reads.

use crate::errors::RunnerError;
use crate::image::ImageRef;
use async_trait::async_trait;

pub mod docker;

pub use docker::DockerRuntime;

/// A container as reported by the runtime's listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerInfo {
    pub id: String,
    /// Image reference the container was created from, as the runtime reports it.
    pub image: String,
}

/// A locally stored image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub id: String,
    pub repo_tags: Vec<String>,
    /// `name@digest` entries for images pulled from a registry.
    pub repo_digests: Vec<String>,
}

#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// List known containers. Stopped containers are included only when asked.
    async fn list_containers(&self, include_stopped: bool) -> Result<Vec<ContainerInfo>, RunnerError>;

    /// Create a container from `image` with its built-in entrypoint and return its ID.
    async fn create_container(&self, image: &str, auto_remove: bool) -> Result<String, RunnerError>;

    async fn start_container(&self, container_id: &str) -> Result<(), RunnerError>;

    async fn list_images(&self) -> Result<Vec<ImageInfo>, RunnerError>;

    /// Pull `image`, returning once the runtime has finished the request.
    async fn pull_image(&self, image: &ImageRef) -> Result<(), RunnerError>;
}
