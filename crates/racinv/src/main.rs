//! racinv
//!
//! Fetches `racadm hwinventory` from an iDRAC over SSH, filters the records
//! and prints them as JSON

use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use eyre::WrapErr;
use racinv_exec::SshExecutorBuilder;
use racinv_inventory::{InventoryCollector, filter};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod config;

use cli::Args;
use config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    let config_path = Config::locate(args.config.as_deref())?;
    let mut config = match &config_path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    config.apply_args(&args);

    init_tracing(&config.logging.level)?;

    match &config_path {
        Some(path) => debug!(path = %path.display(), "loaded configuration"),
        None => debug!("no config file found, using defaults"),
    }

    let host = config.host()?;
    let conn = &config.connection;

    let executor = SshExecutorBuilder::new(host, &conn.user)
        .with_password(&conn.password)
        .with_port(conn.port)
        .build();

    let inventory = InventoryCollector::new(Arc::new(executor))
        .with_timeout(config.timeout())
        .collect()
        .await
        .wrap_err_with(|| format!("failed to collect hardware inventory from {host}"))?;

    let target = filter(&inventory, &config.criteria());
    info!(records = target.len(), "printing selected records");

    let pretty = serde_json::to_string_pretty(&target)?;
    println!("{pretty}");

    Ok(())
}

/// Log to stderr so stdout carries only the JSON document
fn init_tracing(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .wrap_err_with(|| format!("invalid log level {level:?}"))?,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}
