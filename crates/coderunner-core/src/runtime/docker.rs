// src/runtime/docker.rs
use async_trait::async_trait;
use bollard::models::{ContainerCreateBody, HostConfig};
use bollard::query_parameters::{
    CreateContainerOptions as BollardCreateContainerOptionsQuery,
    CreateImageOptions as BollardCreateImageOptionsQuery,
    ListContainersOptions as BollardListContainersOptionsQuery,
    ListImagesOptions as BollardListImagesOptionsQuery,
    StartContainerOptions as BollardStartContainerOptionsQuery,
};
use bollard::{Docker, API_DEFAULT_VERSION};
use futures_util::stream::StreamExt;

use super::{ContainerInfo, ContainerRuntime, ImageInfo};
use crate::errors::RunnerError;
use crate::image::ImageRef;

const CONNECT_TIMEOUT_SECONDS: u64 = 120;

/// [`ContainerRuntime`] backed by the Docker Engine API.
pub struct DockerRuntime {
    docker: Docker,
}

impl DockerRuntime {
    /// Connect using `DOCKER_HOST` or the platform's default socket.
    pub fn connect() -> Result<Self, RunnerError> {
        let docker = Docker::connect_with_local_defaults()?;
        Ok(Self { docker })
    }

    /// Connect to an explicit `unix://`, `tcp://` or `http://` endpoint,
    /// falling back to local defaults when none is given.
    pub fn connect_to(host: Option<&str>) -> Result<Self, RunnerError> {
        let docker = match host {
            None => Docker::connect_with_local_defaults()?,
            Some(host) if host.starts_with("unix://") => {
                Docker::connect_with_socket(host, CONNECT_TIMEOUT_SECONDS, API_DEFAULT_VERSION)?
            }
            Some(host) if host.starts_with("tcp://") || host.starts_with("http://") => {
                Docker::connect_with_http(host, CONNECT_TIMEOUT_SECONDS, API_DEFAULT_VERSION)?
            }
            Some(host) => {
                return Err(RunnerError::ConfigError(format!(
                    "Unsupported docker host '{}'",
                    host
                )))
            }
        };
        Ok(Self { docker })
    }

    pub fn from_client(docker: Docker) -> Self {
        Self { docker }
    }

    pub async fn ping(&self) -> bool {
        self.docker.ping().await.is_ok()
    }
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    async fn list_containers(&self, include_stopped: bool) -> Result<Vec<ContainerInfo>, RunnerError> {
        let options = Some(BollardListContainersOptionsQuery {
            all: include_stopped,
            ..Default::default()
        });
        let summaries = self.docker.list_containers(options).await?;

        Ok(summaries
            .into_iter()
            .filter_map(|summary| {
                Some(ContainerInfo {
                    id: summary.id?,
                    image: summary.image.unwrap_or_default(),
                })
            })
            .collect())
    }

    async fn create_container(&self, image: &str, auto_remove: bool) -> Result<String, RunnerError> {
        let config = ContainerCreateBody {
            image: Some(image.to_string()),
            host_config: Some(HostConfig {
                auto_remove: Some(auto_remove),
                ..Default::default()
            }),
            ..Default::default()
        };

        let container = self
            .docker
            .create_container(None::<BollardCreateContainerOptionsQuery>, config)
            .await?;
        Ok(container.id)
    }

    async fn start_container(&self, container_id: &str) -> Result<(), RunnerError> {
        self.docker
            .start_container(container_id, None::<BollardStartContainerOptionsQuery>)
            .await?;
        Ok(())
    }

    async fn list_images(&self) -> Result<Vec<ImageInfo>, RunnerError> {
        let images = self
            .docker
            .list_images(Some(BollardListImagesOptionsQuery {
                all: false,
                ..Default::default()
            }))
            .await?;

        Ok(images
            .into_iter()
            .map(|summary| ImageInfo {
                id: summary.id,
                repo_tags: summary.repo_tags,
                repo_digests: summary.repo_digests,
            })
            .collect())
    }

    async fn pull_image(&self, image: &ImageRef) -> Result<(), RunnerError> {
        let pull_options = Some(BollardCreateImageOptionsQuery {
            from_image: Some(image.base_name().to_string()),
            tag: Some(image.pull_tag().to_string()),
            ..Default::default()
        });

        let mut pull_stream = self.docker.create_image(pull_options, None, None);
        while let Some(progress) = pull_stream.next().await {
            let info = progress?;
            if let Some(status) = info.status {
                log::debug!("Pulling image {}: {}", image, status);
            }
        }
        Ok(())
    }
}
