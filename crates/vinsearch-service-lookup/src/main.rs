//! Entry point for the VIN lookup HTTP microservice.
//!
//! # Configuration
//!
//! - `SERPAPI_KEY` - SerpApi key. The service starts without it but every
//!   lookup answers `500`.
//! - `SERPAPI_ENDPOINT` - Search endpoint override
//! - `SERVICE_PORT` - HTTP port (default: 8080)
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//! - `METRICS_ENABLED` / `METRICS_PATH` - Metrics endpoint toggle and path (default: /metrics)

use std::net::SocketAddr;

use tracing::{error, info};

use vinsearch_service_lookup::{build_router_with, SERVICE_NAME};
use vinsearch_service_shared::{
    init_logging, init_metrics, AppState, LoggingConfig, MetricsConfig, ServiceConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&LoggingConfig::from_env().with_service(SERVICE_NAME));

    let metrics_config = MetricsConfig::from_env();
    if let Err(e) = init_metrics(&metrics_config) {
        tracing::warn!(error = %e, "failed to initialize metrics, continuing without metrics");
    }

    let config = ServiceConfig::from_env();
    info!(config = ?config, "starting lookup service");

    let state = AppState::from_config(&config).map_err(|e| {
        error!(error = %e, "failed to build application state");
        e
    })?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "listening");

    axum::serve(listener, build_router_with(state, &metrics_config)).await?;

    Ok(())
}
