use crate::config::parse::load_config;
use crate::index::http::HttpIndexStore;
use crate::pipeline::Pipeline;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("config error: {0}")]
    Config(#[from] crate::config::parse::ConfigError),

    #[error("store error: {0}")]
    Store(#[from] crate::index::traits::StoreError),

    #[error("pipeline error: {0}")]
    Pipeline(#[from] crate::pipeline::PipelineError),

    #[error("failed to read payload: {0}")]
    Io(#[from] std::io::Error),
}

/// Feed one encoded batch envelope through the pipeline.
///
/// Reads the payload from `input`, or stdin when no file is given.
pub async fn process(
    config_path: Option<PathBuf>,
    input: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = match config_path {
        Some(path) => path,
        None => {
            eprintln!("Error: config not found");
            eprintln!("Searched locations:");
            eprintln!("  ~/.config/staclog/config.yml");
            eprintln!("  /etc/staclog/config.yml");
            eprintln!("\nUse --config <path> to specify a config file, or run 'staclog config init' to generate one.");
            std::process::exit(1);
        }
    };

    run_batch(&config_path, input).await.map_err(|e| e.into())
}

async fn run_batch(config_path: &PathBuf, input: Option<PathBuf>) -> Result<(), ProcessError> {
    info!(config_path = %config_path.display(), "Loading configuration");
    let config = load_config(config_path)?;

    let payload = read_payload(input)?;

    info!(endpoint = %config.index.endpoint, "Connecting to index service");
    let store = Arc::new(HttpIndexStore::new(&config.index)?);

    let pipeline = Pipeline::new(store, &config);
    let summary = pipeline.process(&payload).await?;

    info!(
        index = %summary.index,
        events = summary.events,
        documents = summary.documents,
        created = summary.created,
        merged = summary.merged,
        replaced = summary.replaced,
        skipped = summary.skipped,
        "Batch processed"
    );

    Ok(())
}

fn read_payload(input: Option<PathBuf>) -> Result<String, std::io::Error> {
    match input {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut payload = String::new();
            std::io::stdin().read_to_string(&mut payload)?;
            Ok(payload)
        }
    }
}
