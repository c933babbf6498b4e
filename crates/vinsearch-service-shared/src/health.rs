//! Liveness and readiness checks.
//!
//! Neither check calls the search provider. Readiness only reflects whether
//! an API key was supplied at startup, since a keyless instance answers every
//! lookup with `500`.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::{AppState, ERROR_MISSING_API_KEY};

const SERVICE: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Health check body, e.g. `{"status":"ok","service":"...","version":"0.1.0"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// `ok`, or `not_ready: <reason>`.
    pub status: String,
    pub service: String,
    pub version: String,
    /// Present on readiness responses only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_configured: Option<bool>,
}

impl HealthStatus {
    fn new(status: impl Into<String>, search_configured: Option<bool>) -> Self {
        Self {
            status: status.into(),
            service: SERVICE.to_string(),
            version: VERSION.to_string(),
            search_configured,
        }
    }

    pub fn alive() -> Self {
        Self::new("ok", None)
    }

    pub fn ready() -> Self {
        Self::new("ok", Some(true))
    }

    pub fn not_ready(reason: &str) -> Self {
        Self::new(format!("not_ready: {reason}"), Some(false))
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// `GET /health/live`: always `200` while the process serves requests.
pub async fn health_live() -> Json<HealthStatus> {
    Json(HealthStatus::alive())
}

/// `GET /health/ready`: `200` with a search key, `503` without one.
pub async fn health_ready(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    if state.is_configured() {
        (StatusCode::OK, Json(HealthStatus::ready()))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthStatus::not_ready(ERROR_MISSING_API_KEY)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{test_state, unconfigured_state};

    #[test]
    fn liveness_body_omits_search_flag() {
        let json = serde_json::to_value(HealthStatus::alive()).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "vinsearch-service-shared");
        assert!(json.get("search_configured").is_none());
    }

    #[test]
    fn not_ready_names_the_reason() {
        let status = HealthStatus::not_ready(ERROR_MISSING_API_KEY);
        assert_eq!(status.status, "not_ready: SERPAPI_KEY not configured");
        assert_eq!(status.search_configured, Some(false));
        assert!(!status.is_ok());
    }

    #[tokio::test]
    async fn ready_with_key() {
        let (code, Json(body)) = health_ready(State(test_state("http://127.0.0.1:9/search"))).await;
        assert_eq!(code, StatusCode::OK);
        assert!(body.is_ok());
        assert_eq!(body.search_configured, Some(true));
    }

    #[tokio::test]
    async fn unavailable_without_key() {
        let (code, Json(body)) = health_ready(State(unconfigured_state())).await;
        assert_eq!(code, StatusCode::SERVICE_UNAVAILABLE);
        assert!(!body.is_ok());
    }

    #[tokio::test]
    async fn live_is_ok() {
        let Json(body) = health_live().await;
        assert_eq!(body, HealthStatus::alive());
    }
}
