//! Service configuration read once at startup.
//!
//! # Environment Variables
//!
//! - `SERPAPI_KEY`: SerpApi key. Empty or unset leaves the service running but
//!   every lookup answers 500.
//! - `SERPAPI_ENDPOINT`: Override of the search endpoint (default: SerpApi)
//! - `SERVICE_PORT`: HTTP port (default: 8080)

use std::fmt;

use vinsearch_lib::SearchConfig;

/// Port used when `SERVICE_PORT` is unset or unparsable.
pub const DEFAULT_PORT: u16 = 8080;

/// Configuration for the lookup service.
#[derive(Clone)]
pub struct ServiceConfig {
    /// SerpApi key, `None` when not configured.
    pub api_key: Option<String>,
    /// Search endpoint override.
    pub search_endpoint: Option<String>,
    /// HTTP listen port.
    pub port: u16,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            search_endpoint: None,
            port: DEFAULT_PORT,
        }
    }
}

impl ServiceConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_key = lookup("SERPAPI_KEY").filter(|key| !key.is_empty());
        let search_endpoint = lookup("SERPAPI_ENDPOINT").filter(|url| !url.is_empty());
        let port = lookup("SERVICE_PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            api_key,
            search_endpoint,
            port,
        }
    }

    /// Configuration with the given key and default everything else.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Search client settings, or `None` when no key is configured.
    pub fn search_config(&self) -> Option<SearchConfig> {
        let key = self.api_key.as_deref()?;
        let config = SearchConfig::new(key);
        Some(match &self.search_endpoint {
            Some(endpoint) => config.with_endpoint(endpoint.clone()),
            None => config,
        })
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("api_key_configured", &self.api_key.is_some())
            .field("search_endpoint", &self.search_endpoint)
            .field("port", &self.port)
            .finish()
    }
}
