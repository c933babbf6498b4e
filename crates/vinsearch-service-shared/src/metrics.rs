//! Prometheus metrics for the lookup service.
//!
//! [`init_metrics`] installs the global recorder once at startup and
//! describes the lookup metrics; [`metrics_handler`] renders them on
//! `/metrics`. The `record_*` helpers are no-ops until a recorder exists, so
//! handlers can call them unconditionally.
//!
//! | Metric | Type | Labels |
//! |--------|------|--------|
//! | `vinsearch_lookups_total` | counter | `status`, `service` |
//! | `vinsearch_lookup_duration_seconds` | histogram | `status` |
//! | `vinsearch_lookups_rejected_total` | counter | `reason`, `service` |

use std::time::Duration;

use axum::http::header;
use axum::response::IntoResponse;
use metrics::Unit;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

const LOOKUPS_TOTAL: &str = "vinsearch_lookups_total";
const LOOKUP_DURATION: &str = "vinsearch_lookup_duration_seconds";
const LOOKUPS_REJECTED: &str = "vinsearch_lookups_rejected_total";

/// Lookups make one or two provider round-trips bounded by a 30 s timeout.
const LOOKUP_DURATION_BUCKETS: [f64; 10] = [0.1, 0.25, 0.5, 1.0, 2.0, 4.0, 8.0, 15.0, 30.0, 60.0];

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// Path the router should mount [`metrics_handler`] on.
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl MetricsConfig {
    /// Read `METRICS_ENABLED` (anything but "false" enables) and `METRICS_PATH`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            enabled: lookup("METRICS_ENABLED")
                .map(|v| !v.trim().eq_ignore_ascii_case("false"))
                .unwrap_or(defaults.enabled),
            path: lookup("METRICS_PATH")
                .filter(|p| p.starts_with('/'))
                .unwrap_or(defaults.path),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricsError {
    Disabled,
    AlreadyInitialized,
    InstallFailed(String),
}

impl std::fmt::Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsError::Disabled => f.write_str("metrics are disabled"),
            MetricsError::AlreadyInitialized => f.write_str("metrics recorder already initialized"),
            MetricsError::InstallFailed(e) => write!(f, "failed to install metrics recorder: {}", e),
        }
    }
}

impl std::error::Error for MetricsError {}

/// Install the Prometheus recorder and describe the lookup metrics.
///
/// # Errors
///
/// Fails when metrics are disabled, when called a second time, or when the
/// exporter rejects its configuration.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }
    if PROMETHEUS_HANDLE.get().is_some() {
        return Err(MetricsError::AlreadyInitialized);
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(LOOKUP_DURATION.to_string()),
            &LOOKUP_DURATION_BUCKETS,
        )
        .and_then(|builder| builder.install_recorder())
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)?;

    metrics::describe_counter!(LOOKUPS_TOTAL, "Lookups answered, by lookup status");
    metrics::describe_histogram!(
        LOOKUP_DURATION,
        Unit::Seconds,
        "Time spent in the lookup engine, provider calls included"
    );
    metrics::describe_counter!(
        LOOKUPS_REJECTED,
        "Requests refused before any lookup, by reason"
    );

    Ok(())
}

/// Render the current metrics, or a comment line before [`init_metrics`].
pub fn render_metrics() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(PrometheusHandle::render)
        .unwrap_or_else(|| "# metrics recorder not installed\n".to_string())
}

/// `GET /metrics` in Prometheus text exposition format.
pub async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        render_metrics(),
    )
}

/// Count a completed lookup under its status label (`found`, `error`, ...).
pub fn record_lookup(status: &str, service: &str) {
    metrics::counter!(
        LOOKUPS_TOTAL,
        "status" => status.to_string(),
        "service" => service.to_string()
    )
    .increment(1);
}

pub fn record_lookup_duration(duration: Duration, status: &str) {
    metrics::histogram!(LOOKUP_DURATION, "status" => status.to_string())
        .record(duration.as_secs_f64());
}

/// Count a request refused before the engine ran (`missing_api_key`, `missing_vin`).
pub fn record_lookup_rejected(reason: &str, service: &str) {
    metrics::counter!(
        LOOKUPS_REJECTED,
        "reason" => reason.to_string(),
        "service" => service.to_string()
    )
    .increment(1);
}
