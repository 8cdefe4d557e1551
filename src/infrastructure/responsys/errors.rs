use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when interacting with the Responsys API
#[derive(Error, Debug)]
pub enum RsysApiError {
    /// Invalid request parameters (HTTP 400, or rejected before sending)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Bad credentials or expired token (HTTP 401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Forbidden - permission denied (HTTP 403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found (HTTP 404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Account throttled (HTTP 429)
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Server error from Responsys (HTTP 5xx)
    #[error("Server error ({0}): {1}")]
    ServerError(StatusCode, String),

    /// Status outside the target set that is not otherwise classified
    #[error("Unexpected status ({0}): {1}")]
    UnexpectedStatus(StatusCode, String),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Network, connection or redirect error
    #[error("Network error: {0}")]
    NetworkError(#[source] reqwest::Error),

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// URL could not be built or resolved
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A call that needs a token was made before logging in
    #[error("Not authenticated - call password_login first")]
    NotAuthenticated,

    /// Every attempt of a try-request failed
    #[error("Request failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        last: Box<RsysApiError>,
    },
}

/// Error body returned by Responsys on failure
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

/// Condense a Responsys error body into a one-line message.
///
/// Falls back to the raw body when it is not the documented JSON shape.
pub fn summarize_error_body(body: &str) -> String {
    let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) else {
        return body.trim().to_string();
    };

    let parts: Vec<&str> = [
        parsed.error_code.as_deref(),
        parsed.title.as_deref(),
        parsed.detail.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|s| !s.is_empty())
    .collect();

    if parts.is_empty() {
        body.trim().to_string()
    } else {
        parts.join(": ")
    }
}

impl RsysApiError {
    /// Classify a non-target HTTP status
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = summarize_error_body(body);
        match status {
            StatusCode::BAD_REQUEST => Self::InvalidRequest(message),
            StatusCode::UNAUTHORIZED => Self::Unauthorized(message),
            StatusCode::FORBIDDEN => Self::Forbidden(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimitExceeded(message),
            status if status.is_server_error() => Self::ServerError(status, message),
            status => Self::UnexpectedStatus(status, message),
        }
    }

    /// Returns true if this error is transient and should be retried
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimitExceeded(_)
                | Self::ServerError(_, _)
                | Self::UnexpectedStatus(_, _)
                | Self::Timeout
                | Self::NetworkError(_)
        )
    }

    /// Returns true if this is a permanent error that should not be retried
    pub fn is_permanent(&self) -> bool {
        !self.is_transient()
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::InvalidRequest(_) => Some(StatusCode::BAD_REQUEST),
            Self::Unauthorized(_) => Some(StatusCode::UNAUTHORIZED),
            Self::Forbidden(_) => Some(StatusCode::FORBIDDEN),
            Self::NotFound(_) => Some(StatusCode::NOT_FOUND),
            Self::RateLimitExceeded(_) => Some(StatusCode::TOO_MANY_REQUESTS),
            Self::ServerError(status, _) | Self::UnexpectedStatus(status, _) => Some(*status),
            Self::RetriesExhausted { last, .. } => last.status(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RsysApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_builder() {
            Self::InvalidRequest(err.to_string())
        } else if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::NetworkError(err)
        }
    }
}
