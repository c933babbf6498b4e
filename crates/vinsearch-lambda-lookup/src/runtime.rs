//! Cold-start state for the Lambda function.
//!
//! The search client is built once per execution environment from
//! `SERPAPI_KEY` (and the optional `SERPAPI_ENDPOINT`) and reused by every
//! invocation. A missing key does not abort the cold start; invocations
//! answer with an error object instead.

use std::sync::OnceLock;
use std::time::Instant;

use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vinsearch_lib::{SearchConfig, SerpApiClient};

static RUNTIME: OnceLock<LambdaRuntime> = OnceLock::new();

/// State shared by all invocations of one execution environment.
pub struct LambdaRuntime {
    search_client: Option<SerpApiClient>,
}

impl LambdaRuntime {
    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let Some(key) = lookup("SERPAPI_KEY").filter(|k| !k.is_empty()) else {
            warn!("SERPAPI_KEY not configured, invocations will be rejected");
            return Self::from_client(None);
        };

        let mut config = SearchConfig::new(key);
        if let Some(endpoint) = lookup("SERPAPI_ENDPOINT").filter(|e| !e.is_empty()) {
            config = config.with_endpoint(endpoint);
        }

        match SerpApiClient::new(config) {
            Ok(client) => Self::from_client(Some(client)),
            Err(e) => {
                warn!(error = %e, "failed to build search client");
                Self::from_client(None)
            }
        }
    }

    pub fn from_client(search_client: Option<SerpApiClient>) -> Self {
        Self { search_client }
    }

    pub fn search_client(&self) -> Option<&SerpApiClient> {
        self.search_client.as_ref()
    }
}

/// Initialize the runtime from the process environment on first call.
pub fn init_runtime() -> &'static LambdaRuntime {
    RUNTIME.get_or_init(|| {
        let start = Instant::now();
        let runtime = LambdaRuntime::from_lookup(|name| std::env::var(name).ok());
        info!(
            search_configured = runtime.search_client().is_some(),
            init_ms = start.elapsed().as_secs_f64() * 1000.0,
            "lambda runtime initialized"
        );
        runtime
    })
}

/// JSON tracing for CloudWatch Logs. `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .json()
        .with_ansi(false)
        .with_target(true)
        .with_current_span(false)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
