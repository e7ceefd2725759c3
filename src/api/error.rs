use serde_json::Value;
use thiserror::Error;

/// Maximum number of error body characters surfaced to callers.
const MAX_ERROR_CHARS: usize = 200;

/// Errors surfaced by the gateway and the feature clients.
///
/// `Clone` so a single refresh outcome can be handed to every queued caller.
#[derive(Clone, Debug, Error)]
pub enum ApiError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Request failed ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("Response error: {0}")]
    Parse(String),
    #[error("Request error: {0}")]
    Serialization(String),
    #[error("Credential store error: {0}")]
    Storage(String),
    #[error("Session expired: no refresh token is stored")]
    RefreshTokenMissing,
    #[error("Session expired: token refresh failed: {0}")]
    RefreshFailed(#[source] Box<ApiError>),
    #[error("Token refresh was interrupted before it completed")]
    RefreshInterrupted,
}

impl ApiError {
    /// Builds an HTTP error from a status code and a raw response body.
    #[must_use]
    pub fn http(status: u16, body: &[u8]) -> Self {
        Self::Http {
            status,
            message: error_message(body),
        }
    }

    /// HTTP status carried by the error, if it came from a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// True when the error ended the session (credentials were cleared).
    #[must_use]
    pub fn is_session_ended(&self) -> bool {
        matches!(self, Self::RefreshTokenMissing | Self::RefreshFailed(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout("Request timed out. Please try again.".to_string())
        } else if err.is_decode() {
            Self::Parse(format!("Failed to decode response: {err}"))
        } else if err.is_builder() {
            Self::Serialization(format!("Failed to build request: {err}"))
        } else {
            Self::Network(format!("Unable to reach the server: {err}"))
        }
    }
}

/// Prefers the server's JSON `message` field, then the sanitized body text.
fn error_message(body: &[u8]) -> String {
    if let Ok(json) = serde_json::from_slice::<Value>(body) {
        if let Some(message) = json.get("message").and_then(Value::as_str) {
            let message = message.trim();
            if !message.is_empty() {
                return truncate(message);
            }
        }
    }

    sanitize_body(&String::from_utf8_lossy(body))
}

/// Sanitizes HTTP error bodies by trimming and truncating.
fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        truncate(trimmed)
    }
}

fn truncate(message: &str) -> String {
    message.chars().take(MAX_ERROR_CHARS).collect()
}
