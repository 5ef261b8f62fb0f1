//! API error taxonomy and response decoding.

use reqwest::{Method, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::resilience::retries::is_retryable;

/// Errors that can occur while talking to the registry backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Connection or transport failure.
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded its deadline.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// HTTP 401 or 403.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// HTTP 400 or 422.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// HTTP 404, or a lookup that found nothing.
    #[error("{0}")]
    NotFound(String),

    /// HTTP 5xx.
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Any other non-success status.
    #[error("Unexpected status {status}: {message}")]
    Status { status: u16, message: String },

    /// Body was not JSON or not the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Successful response carrying an `error` field.
    #[error("{0}")]
    Application(String),

    /// Bearer-authenticated call made without a token.
    #[error("Not logged in: no access token available")]
    MissingToken,

    /// Shutdown was triggered while the request was in flight.
    #[error("Request cancelled")]
    Cancelled,

    /// The request could not be built.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Map a non-success status and its message to an error.
    pub fn from_status(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized(message),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ApiError::Validation(message),
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            s if s.is_server_error() => ApiError::Server {
                status: s.as_u16(),
                message,
            },
            s => ApiError::Status {
                status: s.as_u16(),
                message,
            },
        }
    }

    /// HTTP status behind this error, if it came from a response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Unauthorized(_) => Some(StatusCode::UNAUTHORIZED),
            ApiError::NotFound(_) => Some(StatusCode::NOT_FOUND),
            ApiError::Server { status, .. } | ApiError::Status { status, .. } => {
                StatusCode::from_u16(*status).ok()
            }
            _ => None,
        }
    }

    /// Whether an idempotent request failing this way may be retried.
    pub fn is_retryable(&self) -> bool {
        let connection_error = matches!(self, ApiError::Network(_) | ApiError::Timeout(_));
        is_retryable(&Method::GET, self.status(), connection_error)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            ApiError::InvalidRequest(err.to_string())
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Pull a human message out of an `{error}` or `{message}` body.
fn body_message(body: &Value) -> Option<String> {
    ["error", "message"].iter().find_map(|key| match body.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Object(obj)) => obj
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    })
}

/// Turn a raw response into JSON or a typed error.
///
/// An empty body decodes to `null`. A 2xx body with an `error` field is an
/// [`ApiError::Application`].
pub fn decode_body(status: StatusCode, text: &str) -> ApiResult<Value> {
    let parsed = if text.trim().is_empty() {
        Ok(Value::Null)
    } else {
        serde_json::from_str::<Value>(text)
    };

    if !status.is_success() {
        let message = parsed
            .ok()
            .as_ref()
            .and_then(body_message)
            .or_else(|| {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.chars().take(200).collect())
            })
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
        return Err(ApiError::from_status(status, message));
    }

    let body = parsed.map_err(|e| ApiError::Decode(e.to_string()))?;
    if let Some(message) = body.get("error").and_then(|_| body_message(&body)) {
        return Err(ApiError::Application(message));
    }
    Ok(body)
}
