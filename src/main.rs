use gitlab_wecom_bridge::{AppState, BridgeConfig, Result, api, logging};
use std::sync::Arc;
use tracing::{error, info};

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

async fn run(config: BridgeConfig) -> Result<()> {
    let listen_addr = config.listen_addr.clone();
    let state = Arc::new(AppState::new(config)?);

    info!("Listening on {}", listen_addr);
    info!("Forwarding to {}", state.robot.send_url());
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let config = match BridgeConfig::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    // Held until exit so the file writer flushes.
    let log_guard = match logging::setup_logging(&config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        error!("{}", e);
        drop(log_guard);
        std::process::exit(1);
    }
}
