//! AWS Lambda function for VIN listing lookups.
//!
//! Accepts `{"vin": "<VIN>"}` and returns the same record as the HTTP
//! service. Configuration problems and malformed payloads come back as
//! `{"error": "...", "status": <code>}`.

mod runtime;

use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use runtime::{init_runtime, init_tracing, LambdaRuntime};
use vinsearch_lib::{lookup_vin, Error as LibError, LookupResult};

const ERROR_MISSING_VIN: &str = "VIN parameter required";

#[derive(Debug, Default, Deserialize)]
struct LookupRequest {
    #[serde(default)]
    vin: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct LambdaError {
    error: String,
    status: u16,
}

impl LambdaError {
    fn new(status: u16, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            status,
        }
    }
}

/// Lambda response: the lookup record or an error object.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Response {
    Success(LookupResult),
    Error(LambdaError),
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();
    let runtime = init_runtime();

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        let request_id = event.context.request_id.clone();
        Ok::<_, Error>(handle(runtime, &request_id, event.payload).await)
    }))
    .await
}

async fn handle(runtime: &LambdaRuntime, request_id: &str, payload: Value) -> Response {
    let Some(client) = runtime.search_client() else {
        warn!(request_id, "lookup rejected, search API key not configured");
        return Response::Error(LambdaError::new(500, LibError::MissingApiKey.to_string()));
    };

    let request = match payload {
        Value::Null => LookupRequest::default(),
        payload => match serde_json::from_value::<LookupRequest>(payload) {
            Ok(request) => request,
            Err(e) => {
                warn!(request_id, error = %e, "failed to parse request");
                return Response::Error(LambdaError::new(400, format!("Invalid request: {}", e)));
            }
        },
    };

    let vin = match request.vin.as_deref() {
        Some(vin) if !vin.is_empty() => vin,
        _ => return Response::Error(LambdaError::new(400, ERROR_MISSING_VIN)),
    };

    let result = lookup_vin(client, vin).await;
    info!(
        request_id,
        status = result.status.label(),
        statut = %result.status,
        "lookup served"
    );
    Response::Success(result)
}
