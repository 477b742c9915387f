use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid endpoint {endpoint}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        source: url::ParseError,
    },

    #[error("Not signed in")]
    NoSession,

    #[error("Access token rejected, sign in again")]
    Unauthorized,

    #[error("Server error ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("Failed to parse response from {endpoint}: {source}")]
    Parse {
        endpoint: String,
        source: serde_json::Error,
    },
}
