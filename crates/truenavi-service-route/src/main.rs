//! TrueNavi navigation HTTP microservice.
//!
//! # Configuration
//!
//! - `TRUENAVI_DB_PATH` - Path to the SQLite database (default: truenavi.db)
//! - `TRUENAVI_ROUTE_CACHE` - Reuse the built graph between route queries (default: false)
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//! - `METRICS_ENABLED` - Expose Prometheus metrics (default: true)
//! - `SERVICE_PORT` - HTTP port (default: 8080)

use std::env;
use std::net::SocketAddr;

use tracing::{error, info, warn};

use truenavi_service_route::app;
use truenavi_service_shared::{
    AppState, LoggingConfig, MetricsConfig, init_logging, init_metrics,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging_config = LoggingConfig::from_env().with_service("route");
    init_logging(&logging_config);

    // Metrics are optional; the service still runs without a recorder.
    let metrics_config = MetricsConfig::from_env();
    if let Err(e) = init_metrics(&metrics_config) {
        warn!(error = %e, "failed to initialize metrics, continuing without metrics");
    }

    let db_path = env::var("TRUENAVI_DB_PATH").unwrap_or_else(|_| "truenavi.db".to_string());
    let cache_routes = env::var("TRUENAVI_ROUTE_CACHE")
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);
    let port: u16 = env::var("SERVICE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    info!(db_path = %db_path, port, cache_routes, "starting navigation service");

    let state = AppState::load(&db_path, cache_routes).map_err(|e| {
        error!(error = %e, path = %db_path, "failed to load application state");
        e
    })?;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("navigation service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
