//! CORS policy for browser callers.
//!
//! Every response carries `Access-Control-Allow-Origin: *`. Any `OPTIONS`
//! request is answered by the layer itself with `200 OK`, an empty body, and
//! the allowed methods and headers, so browser preflights never reach a
//! handler.

use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

/// Methods advertised to preflight requests.
pub const ALLOWED_METHODS: [Method; 3] = [Method::GET, Method::POST, Method::OPTIONS];

/// Build the service-wide CORS layer.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([header::CONTENT_TYPE])
}
