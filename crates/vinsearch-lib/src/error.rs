use thiserror::Error;

/// Convenient result alias for the VIN lookup library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when an input string is not a well-formed 17-character VIN.
    #[error("invalid VIN: {input:?}")]
    InvalidVin { input: String },

    /// Raised when a search client is requested without an API key.
    #[error("SERPAPI_KEY not configured")]
    MissingApiKey,

    /// Wrapper for HTTP client errors (transport, status, and body decoding).
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
