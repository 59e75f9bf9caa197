//! Console log aggregator entry point.

mod config;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use consoletail_capture::supervisor;
use consoletail_ec2::{AwsCliClient, ConsoleOutputApi};

fn main() -> anyhow::Result<()> {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = config::Config::parse();
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        region = %config.region,
        folder = %config.folder.display(),
        instances = ?config.ids,
        "starting console log aggregator"
    );

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(config))
}

async fn run(config: config::Config) -> anyhow::Result<()> {
    let client = AwsCliClient::new(&config.region);
    client
        .verify_session()
        .await
        .context("failed establishing AWS session")?;

    let api: Arc<dyn ConsoleOutputApi> = Arc::new(client);
    supervisor::run(
        config.resources(),
        &config.folder,
        api,
        supervisor::POLL_INTERVAL,
    )
    .await
    .context("console capture failed to start")?;

    Ok(())
}
