//! End-to-end execution of a code payload in a container.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::RunnerConfig;
use crate::errors::RunnerError;
use crate::executors::{classify, inject_code, run_entrypoint, DockerCli, ExecBackend, ExecutionResult};
use crate::image::ImageRef;
use crate::locks::KeyedLocks;
use crate::provisioning;
use crate::runtime::{ContainerRuntime, DockerRuntime};

/// A request to run `code` in a container built from `image_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub image_name: String,
    /// Skip the pull and use whatever the runtime already has.
    #[serde(default)]
    pub is_local_image: bool,
    pub code: String,
}

impl ExecutionRequest {
    pub fn new(image_name: impl Into<String>, is_local_image: bool, code: impl Into<String>) -> Self {
        Self {
            image_name: image_name.into(),
            is_local_image,
            code: code.into(),
        }
    }
}

pub struct CodeRunner {
    runtime: Arc<dyn ContainerRuntime>,
    backend: Arc<dyn ExecBackend>,
    config: RunnerConfig,
    /// Keyed by base image name.
    acquisition_locks: KeyedLocks,
    /// Keyed by container ID; the input file is shared per container.
    session_locks: KeyedLocks,
}

impl CodeRunner {
    pub fn new(
        runtime: Arc<dyn ContainerRuntime>,
        backend: Arc<dyn ExecBackend>,
        config: RunnerConfig,
    ) -> Self {
        Self {
            runtime,
            backend,
            config,
            acquisition_locks: KeyedLocks::new(),
            session_locks: KeyedLocks::new(),
        }
    }

    /// Connect to Docker and drive exec sessions through the `docker` CLI.
    pub fn from_config(config: RunnerConfig) -> Result<Self, RunnerError> {
        config.validate()?;
        let runtime = DockerRuntime::connect_to(config.docker_host.as_deref())?;
        let backend = DockerCli::from_config(&config);
        Ok(Self::new(Arc::new(runtime), Arc::new(backend), config))
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run `code` inside a container for `image_name` and return its output.
    ///
    /// Stages run strictly in sequence and the first failure is returned:
    /// pull (unless `is_local_image`), locate or create the container, inject
    /// the code, run the entrypoint, classify the output.
    pub async fn run_container(
        &self,
        image_name: &str,
        is_local_image: bool,
        code: &str,
    ) -> Result<String, RunnerError> {
        self.execute(image_name, is_local_image, code)
            .await?
            .into_result()
    }

    pub async fn run(&self, request: &ExecutionRequest) -> Result<String, RunnerError> {
        self.run_container(&request.image_name, request.is_local_image, &request.code)
            .await
    }

    /// Like [`run_container`](Self::run_container) but returns the
    /// classification instead of folding it into the error type.
    pub async fn execute(
        &self,
        image_name: &str,
        is_local_image: bool,
        code: &str,
    ) -> Result<ExecutionResult, RunnerError> {
        if !is_local_image {
            self.pull_image(image_name).await?;
        }

        let container_id = self.acquire_container(image_name).await?;

        // Inject and run as one unit so a concurrent request on the same
        // container cannot replace the payload in between.
        let _session = self.session_locks.lock(&container_id).await;
        inject_code(self.backend.as_ref(), &container_id, code).await?;

        let output = run_entrypoint(self.backend.as_ref(), &container_id).await?;
        Ok(classify(&output.combined()))
    }

    pub async fn is_image_present(&self, image_name: &str) -> Result<bool, RunnerError> {
        provisioning::is_image_present(self.runtime.as_ref(), image_name).await
    }

    pub async fn pull_image(&self, image_name: &str) -> Result<(), RunnerError> {
        provisioning::ensure_image(self.runtime.as_ref(), image_name, self.config.poll_interval()).await
    }

    /// Reuse a container running the image or start a new one.
    ///
    /// With `serialize_container_acquisition` set, lookups for the same base
    /// image are serialized so concurrent requests share one container.
    pub async fn acquire_container(&self, image_name: &str) -> Result<String, RunnerError> {
        let _guard = if self.config.serialize_container_acquisition {
            let key = ImageRef::parse(image_name).base_name().to_string();
            Some(self.acquisition_locks.lock(&key).await)
        } else {
            None
        };

        let runtime = self.runtime.as_ref();
        match provisioning::find_running(runtime, image_name, self.config.include_stopped_containers).await? {
            Some(container_id) => Ok(container_id),
            None => provisioning::create_and_start(runtime, image_name).await,
        }
    }
}
