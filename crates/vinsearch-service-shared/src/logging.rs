//! Structured logging setup for the lookup service.
//!
//! `LOG_FORMAT` picks JSON (default) or pretty text output. `RUST_LOG` wins
//! over the configured level when set.
//!
//! ```no_run
//! use vinsearch_service_shared::logging::{init_logging, LoggingConfig};
//!
//! init_logging(&LoggingConfig::from_env().with_service("lookup"));
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line, for log shippers.
    #[default]
    Json,
    /// Multi-line human-readable output.
    Text,
}

impl FromStr for LogFormat {
    type Err = std::convert::Infallible;

    /// Unknown values fall back to JSON so a typo never silences logs.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => LogFormat::Text,
            _ => LogFormat::Json,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Fallback filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Recorded once at startup so log lines can be attributed.
    pub service: Option<String>,
    /// Terminal colour codes; off for JSON regardless.
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Json,
            level: "info".to_string(),
            service: None,
            ansi: true,
        }
    }
}

impl LoggingConfig {
    /// Read `LOG_FORMAT`, `RUST_LOG`, `SERVICE_NAME` and `NO_COLOR`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            format: lookup("LOG_FORMAT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.format),
            level: lookup("RUST_LOG")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.level),
            service: lookup("SERVICE_NAME").filter(|v| !v.is_empty()),
            ansi: lookup("NO_COLOR").is_none(),
        }
    }

    /// Set the service name unless `SERVICE_NAME` already did.
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        if self.service.is_none() {
            self.service = Some(service.into());
        }
        self
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }
}

/// Install the global tracing subscriber.
///
/// Call once at startup. A second call is ignored rather than panicking, so
/// tests that build several routers stay safe.
///
/// JSON lines look like:
///
/// ```json
/// {"timestamp":"2026-03-02T10:00:00Z","level":"INFO","fields":{"message":"lookup completed","statut":"Trouvé"},"target":"vinsearch_service_lookup"}
/// ```
pub fn init_logging(config: &LoggingConfig) {
    let registry = tracing_subscriber::registry().with(config.filter());

    let installed = match config.format {
        LogFormat::Text => registry
            .with(fmt::layer().pretty().with_ansi(config.ansi))
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_current_span(false)
                    .with_span_list(false),
            )
            .try_init(),
    };

    if installed.is_ok() {
        tracing::info!(
            service = config.service.as_deref().unwrap_or("vinsearch"),
            format = ?config.format,
            "logging initialized"
        );
    }
}
