//! Application state for the lookup service.
//!
//! The search API key is injected here at construction time; handlers never
//! read the process environment.

use std::sync::Arc;

use vinsearch_lib::{Error as LibError, SerpApiClient};

use crate::config::ServiceConfig;

/// Error during application state initialization.
#[derive(Debug)]
pub enum AppStateError {
    /// Failed to build the search client.
    SearchClient(LibError),
}

impl std::fmt::Display for AppStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SearchClient(e) => write!(f, "failed to build search client: {}", e),
        }
    }
}

impl std::error::Error for AppStateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SearchClient(e) => Some(e),
        }
    }
}

impl From<LibError> for AppStateError {
    fn from(err: LibError) -> Self {
        Self::SearchClient(err)
    }
}

/// Shared application state for all axum handlers.
///
/// This struct is cheaply cloneable (using `Arc` internally) and should be
/// shared via axum's `State` extractor.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, routing::get, extract::State};
/// use vinsearch_service_shared::{AppState, ServiceConfig};
///
/// async fn handler(State(state): State<AppState>) {
///     if let Some(client) = state.search_client() {
///         // ... run a lookup
///     }
/// }
///
/// let state = AppState::from_config(&ServiceConfig::from_env()).unwrap();
/// let app = Router::new()
///     .route("/", get(handler))
///     .with_state(state);
/// ```
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    search_client: Option<SerpApiClient>,
}

impl AppState {
    /// Build application state from service configuration.
    ///
    /// A missing API key is not an error: the state is created without a
    /// search client and lookups report the missing configuration.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, AppStateError> {
        let search_client = match config.search_config() {
            Some(search) => {
                tracing::info!(endpoint = %search.endpoint, "search client configured");
                Some(SerpApiClient::new(search)?)
            }
            None => {
                tracing::warn!("SERPAPI_KEY not configured, lookups will fail");
                None
            }
        };

        Ok(Self::from_client(search_client))
    }

    /// Create application state from a pre-built client.
    ///
    /// This is useful for testing.
    pub fn from_client(search_client: Option<SerpApiClient>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { search_client }),
        }
    }

    /// Access the search client, if an API key was configured.
    pub fn search_client(&self) -> Option<&SerpApiClient> {
        self.inner.search_client.as_ref()
    }

    /// Check if lookups can be served.
    pub fn is_configured(&self) -> bool {
        self.inner.search_client.is_some()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("search_configured", &self.is_configured())
            .finish()
    }
}
