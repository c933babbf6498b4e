//! Request types and validation for HTTP endpoints.

use serde::{Deserialize, Serialize};

use crate::ApiError;

/// Validation trait for request types.
///
/// Implementations should check presence of required parameters and return
/// an [`ApiError`] for unusable input. Format checks that produce a lookup
/// status (such as VIN syntax) belong to the library, not here.
pub trait Validate {
    /// Validate the request, returning an error if invalid.
    fn validate(&self) -> Result<(), ApiError>;
}

/// Query string of the lookup endpoint: `GET /?vin=<VIN>`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupQuery {
    /// Vehicle Identification Number as typed by the caller.
    #[serde(default)]
    pub vin: Option<String>,
}

impl LookupQuery {
    pub fn new(vin: impl Into<String>) -> Self {
        Self {
            vin: Some(vin.into()),
        }
    }

    /// Build from decoded query-string pairs, in request order.
    ///
    /// A repeated `vin` keeps its first non-empty value; blank repeats are
    /// skipped rather than rejected.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let vin = pairs
            .into_iter()
            .filter(|(key, _)| key.as_ref() == "vin")
            .map(|(_, value)| value.into())
            .find(|value| !value.is_empty());
        Self { vin }
    }

    /// The raw VIN, empty when absent.
    pub fn vin(&self) -> &str {
        self.vin.as_deref().unwrap_or("")
    }
}

impl Validate for LookupQuery {
    fn validate(&self) -> Result<(), ApiError> {
        if self.vin().is_empty() {
            return Err(ApiError::missing_vin());
        }
        Ok(())
    }
}
