// src/test_utils/fake_runtime.rs
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

use crate::errors::RunnerError;
use crate::image::ImageRef;
use crate::runtime::{ContainerInfo, ContainerRuntime, ImageInfo};

#[derive(Debug, Clone)]
struct FakeContainer {
    info: ContainerInfo,
    running: bool,
}

#[derive(Default)]
struct FakeState {
    containers: Vec<FakeContainer>,
    images: Vec<ImageInfo>,
    calls: Vec<String>,
    next_id: usize,
    /// Image made visible by a successful pull, and how many more listings
    /// must miss it first.
    pending_pull: Option<(ImageInfo, usize)>,
}

/// Scriptable [`ContainerRuntime`] that records every call.
#[derive(Default)]
pub struct FakeRuntime {
    state: Mutex<FakeState>,
    pull_delay_listings: usize,
    pull_error: Option<String>,
    start_error: Option<String>,
    fail_image_list: bool,
    list_delay: Option<Duration>,
}

impl FakeRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(self, repo_tags: &[&str]) -> Self {
        self.push_image(repo_tags, &[])
    }

    pub fn with_digest_image(self, repo_digests: &[&str]) -> Self {
        self.push_image(&[], repo_digests)
    }

    fn push_image(self, repo_tags: &[&str], repo_digests: &[&str]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let id = format!("sha256:{}", state.images.len());
            state.images.push(ImageInfo {
                id,
                repo_tags: repo_tags.iter().map(|t| t.to_string()).collect(),
                repo_digests: repo_digests.iter().map(|d| d.to_string()).collect(),
            });
        }
        self
    }

    pub fn with_container(self, id: &str, image: &str) -> Self {
        self.push_container(id, image, true)
    }

    pub fn with_stopped_container(self, id: &str, image: &str) -> Self {
        self.push_container(id, image, false)
    }

    fn push_container(self, id: &str, image: &str, running: bool) -> Self {
        self.state.lock().unwrap().containers.push(FakeContainer {
            info: ContainerInfo {
                id: id.to_string(),
                image: image.to_string(),
            },
            running,
        });
        self
    }

    /// After a pull, the first `listings` image listings still miss the image.
    pub fn pull_completes_after(mut self, listings: usize) -> Self {
        self.pull_delay_listings = listings;
        self
    }

    pub fn failing_pull(mut self, message: &str) -> Self {
        self.pull_error = Some(message.to_string());
        self
    }

    pub fn failing_start(mut self, message: &str) -> Self {
        self.start_error = Some(message.to_string());
        self
    }

    pub fn failing_image_list(mut self) -> Self {
        self.fail_image_list = true;
        self
    }

    /// Delay container listings, widening the window between locate and create.
    pub fn with_list_delay(mut self, delay: Duration) -> Self {
        self.list_delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count_calls(&self, operation: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|call| call.split(' ').next() == Some(operation))
            .count()
    }

    fn record(&self, call: String) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl ContainerRuntime for FakeRuntime {
    async fn list_containers(&self, include_stopped: bool) -> Result<Vec<ContainerInfo>, RunnerError> {
        self.record(format!("list_containers all={}", include_stopped));
        let listed = {
            let state = self.state.lock().unwrap();
            state
                .containers
                .iter()
                .filter(|c| include_stopped || c.running)
                .map(|c| c.info.clone())
                .collect()
        };
        if let Some(delay) = self.list_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(listed)
    }

    async fn create_container(&self, image: &str, auto_remove: bool) -> Result<String, RunnerError> {
        self.record(format!("create_container {} auto_remove={}", image, auto_remove));
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = format!("fake-{}", state.next_id);
        state.containers.push(FakeContainer {
            info: ContainerInfo {
                id: id.clone(),
                image: image.to_string(),
            },
            running: false,
        });
        Ok(id)
    }

    async fn start_container(&self, container_id: &str) -> Result<(), RunnerError> {
        self.record(format!("start_container {}", container_id));
        if let Some(message) = &self.start_error {
            return Err(RunnerError::Runtime(message.clone()));
        }
        let mut state = self.state.lock().unwrap();
        match state.containers.iter_mut().find(|c| c.info.id == container_id) {
            Some(container) => {
                container.running = true;
                Ok(())
            }
            None => Err(RunnerError::Runtime(format!("No such container: {}", container_id))),
        }
    }

    async fn list_images(&self) -> Result<Vec<ImageInfo>, RunnerError> {
        self.record("list_images".to_string());
        if self.fail_image_list {
            return Err(RunnerError::Runtime("Cannot connect to the Docker daemon".to_string()));
        }

        let mut state = self.state.lock().unwrap();
        if let Some((image, remaining)) = state.pending_pull.take() {
            if remaining == 0 {
                state.images.push(image);
            } else {
                state.pending_pull = Some((image, remaining - 1));
            }
        }
        Ok(state.images.clone())
    }

    async fn pull_image(&self, image: &ImageRef) -> Result<(), RunnerError> {
        self.record(format!("pull_image {}", image));
        if let Some(message) = &self.pull_error {
            return Err(RunnerError::Runtime(message.clone()));
        }
        let reference = format!("{}:{}", image.base_name(), image.pull_tag());
        let mut state = self.state.lock().unwrap();
        let pulled = ImageInfo {
            id: format!("sha256:{}", state.images.len()),
            // Pulling by digest leaves the image untagged.
            repo_tags: match image.digest() {
                Some(_) => Vec::new(),
                None => vec![reference],
            },
            repo_digests: match image.digest() {
                Some(digest) => vec![format!("{}@{}", image.base_name(), digest)],
                None => Vec::new(),
            },
        };
        state.pending_pull = Some((pulled, self.pull_delay_listings));
        Ok(())
    }
}
