use std::process::ExitCode;

use bourse_core::{BourseConfig, Warehouse};
use bourse_web::{build_router, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match serve().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "bourse-web stopped");
            ExitCode::FAILURE
        }
    }
}

async fn serve() -> Result<(), Box<dyn std::error::Error>> {
    let config = BourseConfig::from_env()?;

    let warehouse_config = config.warehouse.clone();
    tracing::info!(db_path = %warehouse_config.db_path.display(), "opening warehouse");
    let warehouse = tokio::task::spawn_blocking(move || Warehouse::open(warehouse_config)).await??;

    let state = AppState::new(
        warehouse,
        config.collaborators.clone(),
        config.default_history_days,
    );
    let app = build_router(state, &config.server.cors_origins);

    let listener = TcpListener::bind(config.server.bind_addr).await?;
    tracing::info!(addr = %config.server.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
