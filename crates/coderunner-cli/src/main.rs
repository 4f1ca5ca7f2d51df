//! Command-line driver for the CodeRunner execution core
//!
//! Runs a code payload in a runner container, pulls images, and checks local
//! image availability, using the same pipeline a service front end would.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use coderunner_core::{CodeRunner, ConfigLoader, RunnerConfig, RunnerError};
use log::LevelFilter;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::io::AsyncReadExt;

#[derive(Parser, Debug)]
#[clap(author, version, about = "CodeRunner - run code inside runner containers")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    #[clap(long, short, help = "YAML configuration file (defaults plus CODERUNNER_* environment overrides when omitted)")]
    config: Option<PathBuf>,

    #[clap(long, short, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a code payload and print its output
    Run {
        #[clap(long, short)]
        image: String,

        #[clap(long, help = "Use the local image without pulling")]
        local: bool,

        #[clap(long, short, help = "File holding the code payload; stdin when omitted")]
        file: Option<PathBuf>,
    },
    /// Pull an image and wait until it is usable
    Pull { image: String },
    /// Report whether an image is present locally
    Check { image: String },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let log_level_filter = cli.log_level.parse().unwrap_or(LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(log_level_filter)
        .init();

    let config = load_config(cli.config.as_deref()).await?;
    let runner = CodeRunner::from_config(config)?;

    match cli.command {
        Commands::Run { image, local, file } => {
            let code = read_code(file.as_deref()).await?;
            match runner.run_container(&image, local, &code).await {
                Ok(output) => {
                    println!("{}", output);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e @ (RunnerError::NoOutput | RunnerError::Execution(_))) => {
                    eprintln!("{}", e);
                    Ok(ExitCode::from(1))
                }
                Err(e) => Err(e.into()),
            }
        }
        Commands::Pull { image } => {
            runner.pull_image(&image).await?;
            println!("Image {} is available", image);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check { image } => {
            if runner.is_image_present(&image).await? {
                println!("{} is present", image);
                Ok(ExitCode::SUCCESS)
            } else {
                println!("{} is not present", image);
                Ok(ExitCode::from(1))
            }
        }
    }
}

async fn load_config(path: Option<&std::path::Path>) -> Result<RunnerConfig> {
    let config = match path {
        Some(path) => {
            log::info!("Loading configuration from file: {}", path.display());
            ConfigLoader::from_file(path).await?
        }
        None => ConfigLoader::from_env()?,
    };
    Ok(config)
}

async fn read_code(file: Option<&std::path::Path>) -> Result<String> {
    match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read code from {}", path.display())),
        None => {
            let mut code = String::new();
            tokio::io::stdin()
                .read_to_string(&mut code)
                .await
                .context("Failed to read code from stdin")?;
            Ok(code)
        }
    }
}
