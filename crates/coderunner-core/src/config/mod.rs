//! Configuration for the execution pipeline
//!
//! Every setting has a default matching the stock runner images, so an empty
//! YAML document (or no file at all) yields a working configuration.

pub mod types;
pub mod loader;

pub use types::*;
pub use loader::*;


use crate::errors::RunnerError;
use std::path::Path;

/// Load a configuration from a YAML file
pub async fn load_config<P: AsRef<Path>>(path: P) -> Result<RunnerConfig, RunnerError> {
    ConfigLoader::from_file(path).await
}
