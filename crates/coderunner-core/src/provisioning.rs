//! Image and container acquisition
//!
//! These are the runtime-facing steps that run before any code reaches a
//! container: make sure the image exists locally, then find a container
//! already running it or create a fresh auto-removing one.

use std::time::Duration;

use crate::errors::RunnerError;
use crate::image::ImageRef;
use crate::runtime::ContainerRuntime;

/// True if a local image matches `image_name`.
///
/// Tag references match any repo tag they prefix. Digest references match a
/// repo digest with the same base name and digest.
pub async fn is_image_present(
    runtime: &dyn ContainerRuntime,
    image_name: &str,
) -> Result<bool, RunnerError> {
    let images = runtime.list_images().await?;
    let wanted = ImageRef::parse(image_name);

    Ok(images.iter().any(|image| match wanted.digest() {
        Some(digest) => image.repo_digests.iter().any(|entry| {
            let entry = ImageRef::parse(entry);
            entry.digest() == Some(digest) && wanted.same_base(entry.base_name())
        }),
        None => image.repo_tags.iter().any(|tag| tag.starts_with(image_name)),
    }))
}

/// Pull `image_name` and wait until the runtime lists it.
///
/// A failed pull is tolerated only when the image is already present locally,
/// in which case it is logged and the local copy is used. Otherwise the pull
/// error is returned without waiting. After a successful pull the image list
/// is polled every `poll_interval` until the image shows up; there is no
/// upper bound on that wait.
pub async fn ensure_image(
    runtime: &dyn ContainerRuntime,
    image_name: &str,
    poll_interval: Duration,
) -> Result<(), RunnerError> {
    let image = ImageRef::parse(image_name);
    log::info!("Pulling image {}", image);

    if let Err(e) = runtime.pull_image(&image).await {
        if is_image_present(runtime, image_name).await? {
            log::warn!("Pull of {} failed, using local copy: {}", image, e);
            return Ok(());
        }
        return Err(RunnerError::PullFailed {
            image: image_name.to_string(),
            message: e.to_string(),
        });
    }

    while !is_image_present(runtime, image_name).await? {
        log::debug!("Image {} not available yet, waiting", image);
        tokio::time::sleep(poll_interval).await;
    }

    log::info!("Image {} is available", image);
    Ok(())
}

/// ID of the first listed container whose image has the same base name.
pub async fn find_running(
    runtime: &dyn ContainerRuntime,
    image_name: &str,
    include_stopped: bool,
) -> Result<Option<String>, RunnerError> {
    let containers = runtime.list_containers(include_stopped).await?;
    log::info!("Found {} containers", containers.len());

    let wanted = ImageRef::parse(image_name);
    let found = containers
        .into_iter()
        .find(|container| wanted.same_base(&container.image));

    if let Some(container) = &found {
        log::info!(
            "Found container with image: {} with ID: {}",
            image_name,
            container.id
        );
    }
    Ok(found.map(|container| container.id))
}

/// Create an auto-removing container from `image_name` and start it.
///
/// A container that was created but failed to start is left to the runtime.
pub async fn create_and_start(
    runtime: &dyn ContainerRuntime,
    image_name: &str,
) -> Result<String, RunnerError> {
    let container_id = runtime.create_container(image_name, true).await?;
    log::info!("Created container {} from {}", container_id, image_name);

    runtime.start_container(&container_id).await?;
    log::info!("Started container {}", container_id);

    Ok(container_id)
}
