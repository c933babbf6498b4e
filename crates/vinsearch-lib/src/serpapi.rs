//! SerpApi web search client.
//!
//! Issues Google searches through <https://serpapi.com> and returns the
//! organic results of the first page. Only the `link`, `title` and `snippet`
//! fields of each result are kept.

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::error::{Error, Result};
use crate::vin::Vin;

/// Production SerpApi search endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://serpapi.com/search";

/// Per-attempt timeout for outbound searches.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const SEARCH_ENGINE: &str = "google";
const RESULT_COUNT: u32 = 10;
const COUNTRY: &str = "ca";
const LANGUAGE: &str = "fr";

/// Connection settings for [`SerpApiClient`].
#[derive(Clone)]
pub struct SearchConfig {
    pub api_key: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl SearchConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Point the client at a different search endpoint (a local mock in tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchConfig")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Query variants sent for a VIN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchQuery {
    /// Exact-phrase French query, tried first.
    French,
    /// Unquoted English query, tried when the French one returns nothing.
    English,
}

impl SearchQuery {
    /// Render the search string for `vin`.
    pub fn text(self, vin: &Vin) -> String {
        match self {
            SearchQuery::French => format!("\"{}\" voiture vente Canada", vin),
            SearchQuery::English => format!("{} car sale Canada", vin),
        }
    }
}

/// One non-paid search result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OrganicResult {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub link: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub snippet: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl OrganicResult {
    /// Title and snippet joined by a single space, the text every heuristic
    /// runs against.
    pub fn combined_text(&self) -> String {
        format!("{} {}", self.title, self.snippet)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
    #[serde(default)]
    error: Option<String>,
}

/// Thin async client over the SerpApi search endpoint.
#[derive(Debug, Clone)]
pub struct SerpApiClient {
    http: Client,
    config: SearchConfig,
}

impl SerpApiClient {
    /// Build a client for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingApiKey`] for an empty key and [`Error::Http`]
    /// if the underlying HTTP client cannot be constructed.
    pub fn new(config: SearchConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(Error::MissingApiKey);
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(user_agent())
            .build()
            .map_err(Error::Http)?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run one search and return its organic results.
    ///
    /// A response without an `organic_results` array yields an empty list.
    ///
    /// # Errors
    ///
    /// Transport failures, timeouts, non-2xx statuses and undecodable bodies
    /// all surface as [`Error::Http`]. The request URL is stripped from the
    /// error because it carries the API key.
    pub async fn search(&self, vin: &Vin, query: SearchQuery) -> Result<Vec<OrganicResult>> {
        let q = query.text(vin);
        let num = RESULT_COUNT.to_string();
        let params: [(&str, &str); 6] = [
            ("api_key", self.config.api_key.as_str()),
            ("engine", SEARCH_ENGINE),
            ("q", q.as_str()),
            ("num", num.as_str()),
            ("gl", COUNTRY),
            ("hl", LANGUAGE),
        ];

        debug!(vin = %vin, query = ?query, "sending search request");

        let response = self
            .http
            .get(&self.config.endpoint)
            .query(&params)
            .send()
            .await
            .map_err(redact)?
            .error_for_status()
            .map_err(redact)?;

        let body: SearchResponse = response.json().await.map_err(redact)?;

        if let Some(message) = body.error.as_deref() {
            debug!(vin = %vin, provider_error = message, "search provider reported no results");
        }
        debug!(
            vin = %vin,
            results = body.organic_results.len(),
            "search request completed"
        );

        Ok(body.organic_results)
    }
}

fn redact(err: reqwest::Error) -> Error {
    Error::Http(err.without_url())
}

fn user_agent() -> String {
    format!(
        "vinsearch-lib/{version} ({repo})",
        version = env!("CARGO_PKG_VERSION"),
        repo = "https://github.com/scetrov/vinsearch-rs"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vin() -> Vin {
        Vin::parse("1HGCM82633A004352").unwrap()
    }

    #[test]
    fn query_text_variants() {
        assert_eq!(
            SearchQuery::French.text(&vin()),
            "\"1HGCM82633A004352\" voiture vente Canada"
        );
        assert_eq!(
            SearchQuery::English.text(&vin()),
            "1HGCM82633A004352 car sale Canada"
        );
    }

    #[test]
    fn config_defaults() {
        let config = SearchConfig::new("key");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn config_debug_redacts_api_key() {
        let config = SearchConfig::new("super-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("redacted"));
    }

    #[test]
    fn empty_api_key_is_rejected() {
        let err = SerpApiClient::new(SearchConfig::new("")).unwrap_err();
        assert!(matches!(err, Error::MissingApiKey));
    }

    #[test]
    fn response_without_results_deserializes_to_empty() {
        let body: SearchResponse =
            serde_json::from_str(r#"{"search_metadata":{"status":"Success"}}"#).unwrap();
        assert!(body.organic_results.is_empty());
    }

    #[test]
    fn organic_result_tolerates_missing_fields() {
        let body: SearchResponse =
            serde_json::from_str(r#"{"organic_results":[{"link":"https://a.ca"}]}"#).unwrap();
        assert_eq!(body.organic_results[0].link, "https://a.ca");
        assert_eq!(body.organic_results[0].title, "");
        assert_eq!(body.organic_results[0].combined_text(), " ");
    }

    #[test]
    fn organic_result_treats_null_as_empty() {
        let result: OrganicResult =
            serde_json::from_str(r#"{"link":"https://a.ca","title":"T","snippet":null}"#)
                .unwrap();
        assert_eq!(result.snippet, "");
    }
}
