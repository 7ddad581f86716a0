use thiserror::Error;

/// Errors surfaced by the record store client.
///
/// One failure surfaces immediately to the caller; there are no retries.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("no record with id {0}")]
    NotFound(String),

    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}
