//! VIN listing lookup HTTP microservice.
//!
//! # Endpoints
//!
//! - `GET /?vin=<VIN>` and `GET /api/search?vin=<VIN>` - Look up a VIN
//! - `OPTIONS` on any path - CORS preflight, answered with `200` and no body
//! - `GET /metrics` - Prometheus metrics endpoint
//! - `GET /health/live` - Kubernetes liveness check
//! - `GET /health/ready` - Kubernetes readiness check
//!
//! Lookup outcomes, including an invalid VIN or a failing search provider,
//! are `200` responses whose `statut` field says what happened. Only a missing
//! API key (`500`) and a missing `vin` parameter (`400`) are HTTP errors.

#![deny(warnings)]

use std::time::Instant;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use tracing::{info, warn};

use vinsearch_lib::lookup_vin;
use vinsearch_service_shared::{
    cors_layer, health_live, health_ready, metrics_handler, record_lookup, record_lookup_duration,
    record_lookup_rejected, ApiError, AppState, LookupQuery, MetricsConfig, MetricsLayer, RequestId,
    Validate,
};

/// Service name used in metric labels and logs.
pub const SERVICE_NAME: &str = "lookup";

/// Paths owned by the service; a metrics path may not shadow them.
const RESERVED_PATHS: [&str; 4] = ["/", "/api/search", "/health/live", "/health/ready"];

/// Build the service router around `state` with metrics on `/metrics`.
pub fn build_router(state: AppState) -> Router {
    build_router_with(state, &MetricsConfig::default())
}

/// Build the service router, mounting the metrics endpoint per `metrics`.
///
/// Disabled metrics mount nothing. A path that collides with a service
/// route falls back to `/metrics`.
pub fn build_router_with(state: AppState, metrics: &MetricsConfig) -> Router {
    let mut router = Router::new()
        .route("/", get(lookup_handler))
        .route("/api/search", get(lookup_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready));

    if metrics.enabled {
        let path = if RESERVED_PATHS.contains(&metrics.path.as_str()) {
            warn!(path = %metrics.path, "metrics path collides with a service route, using /metrics");
            "/metrics"
        } else {
            metrics.path.as_str()
        };
        router = router.route(path, get(metrics_handler));
    }

    router
        .layer(cors_layer())
        .layer(MetricsLayer)
        .with_state(state)
}

/// Handle `GET /?vin=<VIN>`.
async fn lookup_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let Some(client) = state.search_client() else {
        warn!(request_id = %request_id, "lookup rejected, search API key not configured");
        record_lookup_rejected("missing_api_key", SERVICE_NAME);
        return ApiError::missing_api_key().into_response();
    };

    let query = LookupQuery::from_pairs(params);
    if let Err(err) = query.validate() {
        info!(request_id = %request_id, "lookup rejected, no VIN supplied");
        record_lookup_rejected("missing_vin", SERVICE_NAME);
        return err.into_response();
    }

    let started = Instant::now();
    let result = lookup_vin(client, query.vin()).await;
    let label = result.status.label();

    record_lookup(label, SERVICE_NAME);
    record_lookup_duration(started.elapsed(), label);
    info!(
        request_id = %request_id,
        vin = query.vin(),
        status = label,
        statut = %result.status,
        "lookup served"
    );

    Json(result).into_response()
}
