//! Test helpers for handler and router tests.
//!
//! States built here point the search client at a mock endpoint, normally a
//! `wiremock::MockServer`, so no test ever reaches SerpApi.

use std::time::Duration;

use vinsearch_lib::{SearchConfig, SerpApiClient};

use crate::state::AppState;

/// API key carried by test states. Mocks can match on it.
pub const TEST_API_KEY: &str = "test-serpapi-key";

/// A VIN that passes validation.
pub const SAMPLE_VIN: &str = "1HGCM82633A004352";

/// Timeout short enough for delay-based tests to finish quickly.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(2);

/// State whose search client sends requests to `endpoint`.
///
/// # Panics
///
/// Panics if the client cannot be built, which only happens on a broken TLS
/// backend.
pub fn test_state(endpoint: &str) -> AppState {
    let config = SearchConfig::new(TEST_API_KEY)
        .with_endpoint(endpoint)
        .with_timeout(TEST_TIMEOUT);
    let client = SerpApiClient::new(config)
        .unwrap_or_else(|e| panic!("failed to build test search client: {e}"));
    AppState::from_client(Some(client))
}

/// State started without an API key.
pub fn unconfigured_state() -> AppState {
    AppState::from_client(None)
}

/// Unique request ID for correlation assertions.
pub fn test_request_id() -> String {
    format!("test-{}", uuid::Uuid::now_v7())
}
