//! HTTP server for the estimator engine.
//!
//! Environment:
//!
//! - `ESTIMATOR_CONFIG_DIR`: configuration directory (default `./config/za`)
//! - `ESTIMATOR_BIND_ADDR`: listen address (default `127.0.0.1:8080`)
//! - `RUST_LOG`: tracing filter (default `info`)

use std::env;

use anyhow::Context;
use estimator_engine::api::{AppState, create_router};
use estimator_engine::config::ConfigLoader;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_DIR: &str = "./config/za";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config_dir = env::var("ESTIMATOR_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let bind_addr = env::var("ESTIMATOR_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

    let loader = ConfigLoader::load(&config_dir)
        .with_context(|| format!("loading configuration from {config_dir}"))?;
    tracing::info!(
        rule_set = %loader.metadata().name,
        version = %loader.metadata().version,
        tax_years = loader.config().tax_years().len(),
        "Configuration loaded"
    );

    let router = create_router(AppState::new(loader));
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    tracing::info!("Listening on {}", bind_addr);
    axum::serve(listener, router).await?;
    Ok(())
}
