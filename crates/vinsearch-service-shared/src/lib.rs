//! Shared infrastructure for the VIN lookup HTTP microservice.
//!
//! This crate provides the HTTP glue around `vinsearch-lib`:
//!
//! - [`AppState`]: Search client built once from injected configuration
//! - [`ServiceConfig`]: Environment-driven service configuration
//! - [`health_live`] / [`health_ready`]: Health check handlers for Kubernetes liveness/readiness checks
//! - [`ApiError`]: `{"error": "..."}` JSON error responses
//! - [`cors_layer`]: Permissive CORS for browser callers
//! - [`metrics`]: Prometheus metrics infrastructure
//! - [`logging`]: Structured JSON logging setup
//! - [`middleware`]: Request tracking and metrics middleware
//! - [`LookupQuery`]: Query-string parameters with validation
//!
//! # Architecture
//!
//! The service follows a thin-handler pattern where all business logic resides
//! in `vinsearch-lib`. This crate provides only HTTP glue:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler                                               │
//! │  - Check the search client is configured                    │
//! │  - Validate the query string                                │
//! │  - Call vinsearch_lib::lookup_vin                           │
//! │  - Serialize the lookup record                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides state builders pointed at a mock search
//! endpoint. Enable the `test-utils` feature to access it from dependent crates.

#![deny(warnings)]

mod config;
mod cors;
mod error;
mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod request;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{ServiceConfig, DEFAULT_PORT};
pub use cors::cors_layer;
pub use error::{ApiError, ERROR_MISSING_API_KEY, ERROR_MISSING_VIN};
pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_lookup, record_lookup_duration, record_lookup_rejected,
    MetricsConfig, MetricsError,
};
pub use middleware::{extract_or_generate_request_id, MetricsLayer, RequestId};
pub use request::{LookupQuery, Validate};
pub use state::{AppState, AppStateError};
