use anyhow::Context;
use login_service::telemetry::{init_tracing, TracingConfig};
use login_service::{http, Config, TokenEngine};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("invalid configuration")?;
    init_tracing(&TracingConfig::from_config(&config));

    info!(service = %config.service_name, "Starting Login Service");

    let addr = config.bind_address();
    let engine = Arc::new(TokenEngine::demo(config)?);
    let app = http::router(engine);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "Login Service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Login Service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
