//! Request correlation and HTTP metrics middleware.
//!
//! [`MetricsLayer`] wraps the whole router. For every request it:
//!
//! - takes `X-Request-ID` from the caller or generates a UUID v7
//! - stores the [`RequestId`] in the request extensions for handlers
//! - opens a `request` span carrying the ID, method and path label
//! - echoes the ID back in the `X-Request-ID` response header
//! - records `http_requests_total` and `http_request_duration_seconds`
//!
//! Path labels are restricted to the routes the service serves; anything
//! else is counted as `unmatched` so scanners cannot grow label cardinality.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::http::{HeaderMap, HeaderName, HeaderValue, Request, Response};
use pin_project_lite::pin_project;
use tower::{Layer, Service};
use tracing::{info_span, Span};
use uuid::Uuid;

/// Correlation header read from requests and written to responses.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Paths reported verbatim in metric labels.
const KNOWN_PATHS: [&str; 5] = ["/", "/api/search", "/health/live", "/health/ready", "/metrics"];

/// Request correlation ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh time-sortable UUID v7.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Use the caller's `X-Request-ID` when it is non-empty visible ASCII,
/// otherwise generate one.
pub fn extract_or_generate_request_id(headers: &HeaderMap) -> RequestId {
    headers
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(RequestId::new)
        .unwrap_or_else(RequestId::generate)
}

/// Metric label for a request path.
fn path_label(path: &str) -> &'static str {
    KNOWN_PATHS
        .iter()
        .copied()
        .find(|known| *known == path)
        .unwrap_or("unmatched")
}

fn status_bucket(status: u16) -> &'static str {
    match status {
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

/// Tower layer installing [`MetricsMiddleware`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsLayer;

impl<S> Layer<S> for MetricsLayer {
    type Service = MetricsMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MetricsMiddleware { inner }
    }
}

#[derive(Debug, Clone)]
pub struct MetricsMiddleware<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for MetricsMiddleware<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = MetricsFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let method = req.method().as_str().to_string();
        let path = path_label(req.uri().path());
        let request_id = extract_or_generate_request_id(req.headers());

        let span = info_span!(
            "request",
            request_id = %request_id,
            method = %method,
            path = path,
        );
        span.in_scope(|| tracing::debug!("request received"));

        req.extensions_mut().insert(request_id.clone());

        MetricsFuture {
            inner: self.inner.call(req),
            start: Instant::now(),
            method,
            path,
            request_id,
            span,
        }
    }
}

pin_project! {
    /// Response future that records metrics and tags the response on completion.
    pub struct MetricsFuture<F> {
        #[pin]
        inner: F,
        start: Instant,
        method: String,
        path: &'static str,
        request_id: RequestId,
        span: Span,
    }
}

impl<F, ResBody, E> Future for MetricsFuture<F>
where
    F: Future<Output = Result<Response<ResBody>, E>>,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let _enter = this.span.enter();

        let mut result = match this.inner.poll(cx) {
            Poll::Pending => return Poll::Pending,
            Poll::Ready(result) => result,
        };

        let elapsed = this.start.elapsed();
        let status = match &mut result {
            Ok(response) => {
                if let Ok(value) = HeaderValue::from_str(this.request_id.as_str()) {
                    response.headers_mut().insert(REQUEST_ID_HEADER, value);
                }
                let status = response.status().as_u16();
                tracing::info!(
                    status,
                    latency_ms = elapsed.as_secs_f64() * 1000.0,
                    "request completed"
                );
                status_bucket(status)
            }
            Err(_) => {
                tracing::error!(
                    latency_ms = elapsed.as_secs_f64() * 1000.0,
                    "request failed"
                );
                "5xx"
            }
        };

        metrics::counter!(
            "http_requests_total",
            "method" => this.method.clone(),
            "path" => *this.path,
            "status" => status
        )
        .increment(1);
        metrics::histogram!(
            "http_request_duration_seconds",
            "method" => this.method.clone(),
            "path" => *this.path
        )
        .record(elapsed.as_secs_f64());

        Poll::Ready(result)
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use super::*;
    use tower::ServiceExt;

    #[test]
    fn test_generated_ids_are_unique_uuids() {
        let a = RequestId::generate();
        let b = RequestId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn test_caller_id_is_kept() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Request-ID", HeaderValue::from_static("abc-123"));
        assert_eq!(extract_or_generate_request_id(&headers).as_str(), "abc-123");
    }

    #[test]
    fn test_blank_caller_id_is_replaced() {
        let mut headers = HeaderMap::new();
        headers.insert("x-request-id", HeaderValue::from_static("   "));
        assert_eq!(extract_or_generate_request_id(&headers).as_str().len(), 36);
    }

    #[test]
    fn test_path_label() {
        assert_eq!(path_label("/"), "/");
        assert_eq!(path_label("/api/search"), "/api/search");
        assert_eq!(path_label("/health/ready"), "/health/ready");
        assert_eq!(path_label("/wp-admin/login.php"), "unmatched");
        assert_eq!(path_label("/api/search/extra"), "unmatched");
    }

    #[test]
    fn test_status_bucket() {
        assert_eq!(status_bucket(200), "2xx");
        assert_eq!(status_bucket(400), "4xx");
        assert_eq!(status_bucket(503), "5xx");
        assert_eq!(status_bucket(101), "other");
    }

    #[tokio::test]
    async fn test_request_id_echoed_and_exposed_to_handler() {
        let service = MetricsLayer.layer(tower::service_fn(|req: Request<()>| async move {
            let seen = req
                .extensions()
                .get::<RequestId>()
                .map(|id| id.to_string())
                .unwrap_or_default();
            Ok::<_, Infallible>(Response::new(seen))
        }));

        let request = Request::builder()
            .uri("/api/search?vin=X")
            .header("x-request-id", "trace-42")
            .body(())
            .unwrap();
        let response = service.oneshot(request).await.unwrap();

        assert_eq!(response.headers()["x-request-id"], "trace-42");
        assert_eq!(response.body(), "trace-42");
    }
}
