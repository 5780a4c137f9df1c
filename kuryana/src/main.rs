use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info};

use kuryana_core::{config::load_config, logging, Dispatcher, HttpTransport};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load and validate configuration
    let config = load_config()?;

    // 2. Initialize logging
    logging::init_logging(&config.logging)?;
    info!("Kuryana starting...");
    info!("Upstream: {}", config.upstream.base_url);

    // 3. Single long-lived transport, injected into the dispatcher
    let transport = HttpTransport::new(&config.upstream).context("failed to build upstream client")?;
    let dispatcher = Dispatcher::new(Arc::new(transport));

    // 4. Serve
    let router = kuryana_api::create_router(dispatcher);
    let http_address = config.http_address();
    let listener = tokio::net::TcpListener::bind(&http_address)
        .await
        .with_context(|| format!("failed to bind HTTP address {http_address}"))?;
    info!("HTTP server listening on {}", http_address);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("HTTP server shut down gracefully");
    Ok(())
}

/// Wait for a shutdown signal (SIGTERM or SIGINT/Ctrl+C)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("Received Ctrl+C"); }
        () = terminate => { info!("Received SIGTERM"); }
    }
}
