//! HTTP-level tests for the lookup router, with SerpApi mocked by wiremock.

use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};
use vinsearch_service_lookup::{build_router, build_router_with};
use vinsearch_service_shared::test_utils::{test_state, unconfigured_state, SAMPLE_VIN};
use vinsearch_service_shared::MetricsConfig;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RECORD_FIELDS: [&str; 10] = [
    "vin",
    "prix",
    "concessionnaire",
    "url",
    "annee",
    "marque",
    "modele",
    "km",
    "description",
    "statut",
];

async fn server_with_results(results: Value) -> (TestServer, MockServer) {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organic_results": results
        })))
        .mount(&mock)
        .await;

    let state = test_state(&format!("{}/search", mock.uri()));
    let server = TestServer::new(build_router(state)).unwrap();
    (server, mock)
}

fn autotrader_listing() -> Value {
    json!([{
        "link": "https://www.autotrader.ca/a/honda/civic/5_123",
        "title": format!("{SAMPLE_VIN} | Honda Civic"),
        "snippet": "2015 Honda Civic, 85,000 km, $12,500"
    }])
}

#[tokio::test]
async fn lookup_returns_full_record() {
    let (server, _mock) = server_with_results(autotrader_listing()).await;

    let response = server.get("/").add_query_param("vin", SAMPLE_VIN).await;

    response.assert_status_ok();
    assert_eq!(response.header("access-control-allow-origin"), "*");
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({
            "vin": SAMPLE_VIN,
            "prix": "12 500$",
            "concessionnaire": "AutoTrader",
            "url": "https://www.autotrader.ca/a/honda/civic/5_123",
            "annee": "2015",
            "marque": "Honda",
            "modele": "Civic",
            "km": "85 000 km",
            "description": format!("{SAMPLE_VIN} | Honda Civic"),
            "statut": "Trouvé"
        })
    );
}

#[tokio::test]
async fn api_search_path_serves_the_same_lookup() {
    let (server, _mock) = server_with_results(autotrader_listing()).await;

    let response = server
        .get("/api/search")
        .add_query_param("vin", SAMPLE_VIN)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["statut"], "Trouvé");
}

#[tokio::test]
async fn missing_api_key_is_500() {
    let server = TestServer::new(build_router(unconfigured_state())).unwrap();

    let response = server.get("/").add_query_param("vin", SAMPLE_VIN).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.header("access-control-allow-origin"), "*");
    let body: Value = response.json();
    assert_eq!(body, json!({ "error": "SERPAPI_KEY not configured" }));
}

#[tokio::test]
async fn missing_api_key_wins_over_missing_vin() {
    let server = TestServer::new(build_router(unconfigured_state())).unwrap();

    let response = server.get("/").await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn missing_vin_is_400() {
    let (server, mock) = server_with_results(json!([])).await;

    let response = server.get("/").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.header("access-control-allow-origin"), "*");
    let body: Value = response.json();
    assert_eq!(body, json!({ "error": "VIN parameter required" }));
    assert!(mock.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn empty_vin_is_400() {
    let (server, _mock) = server_with_results(json!([])).await;

    let response = server.get("/").add_query_param("vin", "").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_vin_is_200_with_status() {
    let (server, mock) = server_with_results(autotrader_listing()).await;

    let response = server.get("/").add_query_param("vin", "ABC123").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["vin"], "ABC123");
    assert_eq!(body["statut"], "VIN invalide");
    for field in RECORD_FIELDS {
        assert!(body.get(field).is_some(), "missing field {field}");
    }
    assert_eq!(body["prix"], "");
    assert!(mock.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn not_found_after_both_queries() {
    let (server, mock) = server_with_results(json!([])).await;

    let response = server.get("/").add_query_param("vin", SAMPLE_VIN).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["statut"], "Non trouvé");
    assert_eq!(body["url"], "");
    assert_eq!(mock.received_requests().await.unwrap_or_default().len(), 2);
}

#[tokio::test]
async fn provider_failure_is_reported_in_status() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock)
        .await;
    let state = test_state(&format!("{}/search", mock.uri()));
    let server = TestServer::new(build_router(state)).unwrap();

    let response = server.get("/").add_query_param("vin", SAMPLE_VIN).await;

    response.assert_status_ok();
    let body: Value = response.json();
    let statut = body["statut"].as_str().unwrap();
    assert!(statut.starts_with("Erreur: "), "unexpected statut {statut}");
    assert!(statut.chars().count() <= "Erreur: ".len() + 50);
    assert_eq!(body["vin"], SAMPLE_VIN);
    assert_eq!(body["prix"], "");
}

#[tokio::test]
async fn preflight_is_answered_without_body() {
    let (server, mock) = server_with_results(json!([])).await;

    let response = server
        .method(Method::OPTIONS, "/")
        .add_header(
            HeaderName::from_static("origin"),
            HeaderValue::from_static("https://example.org"),
        )
        .add_header(
            HeaderName::from_static("access-control-request-method"),
            HeaderValue::from_static("GET"),
        )
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("access-control-allow-origin"), "*");
    let methods = response.header("access-control-allow-methods");
    let methods = methods.to_str().unwrap();
    assert!(methods.contains("GET"));
    assert!(methods.contains("OPTIONS"));
    assert!(response
        .header("access-control-allow-headers")
        .to_str()
        .unwrap()
        .eq_ignore_ascii_case("content-type"));
    assert!(response.as_bytes().is_empty());
    assert!(mock.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn request_id_is_echoed() {
    let (server, _mock) = server_with_results(json!([])).await;

    let response = server
        .get("/health/live")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("trace-7"),
        )
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("x-request-id"), "trace-7");
}

#[tokio::test]
async fn readiness_reflects_configuration() {
    let (configured, _mock) = server_with_results(json!([])).await;
    configured.get("/health/ready").await.assert_status_ok();

    let unconfigured = TestServer::new(build_router(unconfigured_state())).unwrap();
    let response = unconfigured.get("/health/ready").await;
    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn metrics_endpoint_responds() {
    let (server, _mock) = server_with_results(json!([])).await;

    let response = server.get("/metrics").await;

    response.assert_status_ok();
    assert!(response.text().starts_with('#'));
}

#[tokio::test]
async fn repeated_vin_without_key_is_500() {
    let server = TestServer::new(build_router(unconfigured_state())).unwrap();

    let response = server.get(&format!("/?vin={SAMPLE_VIN}&vin=X")).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body, json!({ "error": "SERPAPI_KEY not configured" }));
}

#[tokio::test]
async fn repeated_vin_uses_first_value() {
    let (server, _mock) = server_with_results(autotrader_listing()).await;

    let response = server
        .get(&format!("/api/search?vin={SAMPLE_VIN}&vin=X"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["vin"], SAMPLE_VIN);
    assert_eq!(body["statut"], "Trouvé");
}

#[tokio::test]
async fn blank_first_vin_falls_through_to_next() {
    let (server, _mock) = server_with_results(autotrader_listing()).await;

    let response = server.get(&format!("/?vin=&vin={SAMPLE_VIN}")).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["vin"], SAMPLE_VIN);
}

#[tokio::test]
async fn metrics_mount_on_configured_path() {
    let config = MetricsConfig {
        enabled: true,
        path: "/internal/metrics".to_string(),
    };
    let server = TestServer::new(build_router_with(unconfigured_state(), &config)).unwrap();

    server.get("/internal/metrics").await.assert_status_ok();
    assert_eq!(
        server.get("/metrics").await.status_code(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn disabled_metrics_mount_nothing() {
    let config = MetricsConfig {
        enabled: false,
        ..MetricsConfig::default()
    };
    let server = TestServer::new(build_router_with(unconfigured_state(), &config)).unwrap();

    assert_eq!(
        server.get("/metrics").await.status_code(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn colliding_metrics_path_keeps_service_route() {
    let config = MetricsConfig {
        enabled: true,
        path: "/health/live".to_string(),
    };
    let server = TestServer::new(build_router_with(unconfigured_state(), &config)).unwrap();

    let live: Value = server.get("/health/live").await.json();
    assert_eq!(live["status"], "ok");
    server.get("/metrics").await.assert_status_ok();
}
