use thiserror::Error;

/// Errors returned by the locations API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network, TLS, or timeout failure before a full response arrived.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a status the caller did not ask for.
    #[error("upstream API returned status {status}")]
    UpstreamStatus {
        status: u16,
        body: Option<serde_json::Value>,
    },

    /// The status was right but the body did not have the expected shape.
    #[error("unexpected response body for {context} (status {status})")]
    UnexpectedBody { status: u16, context: String },

    #[error("invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl ApiError {
    /// HTTP status attached to the error, if a response was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::UpstreamStatus { status, .. } | ApiError::UnexpectedBody { status, .. } => {
                Some(*status)
            }
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            ApiError::InvalidBaseUrl { .. } => None,
        }
    }

    /// `true` when the API rejected a payload with `400` and a body whose
    /// `name` is `"ValidationError"`.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            ApiError::UpstreamStatus { status: 400, body: Some(body) }
                if body.get("name").and_then(serde_json::Value::as_str) == Some("ValidationError")
        )
    }
}
