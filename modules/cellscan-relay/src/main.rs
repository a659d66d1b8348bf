use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cellscan_common::Config;
use inference_client::InferenceClient;

mod routes;
mod store;
mod validate;

use store::TempStore;

/// Process-wide immutable state: configuration plus the two collaborators
/// every request needs. Built once in main, shared by reference.
pub struct AppState {
    pub config: Config,
    pub store: TempStore,
    pub inference: InferenceClient,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("relay=info".parse()?))
        .init();

    let config = Config::from_env();

    let store = TempStore::new(&config.upload_dir)?;
    let inference = InferenceClient::new(
        &config.inference_url,
        Duration::from_secs(config.inference_timeout_secs),
    );

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!(
        inference_url = %config.inference_url,
        upload_dir = %config.upload_dir,
        max_upload_bytes = config.max_upload_bytes,
        "CellScan relay starting on {addr}"
    );

    let state = Arc::new(AppState { config, store, inference });
    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
