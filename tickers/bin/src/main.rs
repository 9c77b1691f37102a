mod config;
mod di;

use crate::config::Config;
use crate::di::create_app_module;
use anyhow::Context;
use shaku::HasComponent;
use std::sync::Arc;
use tickers_application::{QueryService, RefreshService};
use tickers_infrastructure::create_router;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ticker service");

    let module = create_app_module(&config).context("Failed to open ticker database")?;
    let refresh: Arc<dyn RefreshService> = module.resolve();
    let query: Arc<dyn QueryService> = module.resolve();

    if config.mock_source {
        info!("Using mock quote source");
    } else {
        info!("Fetching tickers from {}", config.source_url);
    }

    if let Err(e) = refresh.bootstrap().await {
        error!("Initial ticker snapshot could not be stored: {}", e);
        return Err(e).context("Refusing to serve without an initial snapshot");
    }

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    info!("Starting server at http://{}/", config.listen_addr);

    let refresher = refresh.clone();
    let refresh_task = tokio::spawn(async move { refresher.run().await });

    axum::serve(listener, create_router(query))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
            info!("Received shutdown signal, stopping gracefully...");
        })
        .await
        .context("HTTP server failed")?;

    refresh_task.abort();
    info!(
        "Shutdown complete after {} refresh cycles",
        refresh.cycles_started()
    );

    Ok(())
}
