use std::{net::SocketAddr, time::Duration};

use axum::Router;
use configs::AppConfig;
use persistence::Storage;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")))
}

/// Router over an already opened storage; also used by the integration tests.
pub fn app(storage: Storage, request_timeout: Duration) -> Router {
    routes::build_router(AppState::new(storage), build_cors(), request_timeout)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl_c");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

/// Public entry: open storage (migrating it), then serve HTTP until Ctrl+C.
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    let addr = bind_addr(&cfg)?;

    // refuse to serve on a schema we could not bring up to date
    let storage = Storage::open(&cfg.database).await?;

    let app = app(storage.clone(), Duration::from_secs(cfg.server.request_timeout_secs));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "starting customers server");
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    storage.close().await;
    info!("server stopped");
    Ok(())
}
