//! Research session error types.

use thiserror::Error;

use super::category::ErrorCategory;
use crate::config::ConfigError;
use crate::traits::HttpError;

/// Why a research session could not start or ended early.
///
/// The `Display` text of the terminal variants is what gets published as the
/// session's `error_message`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// `start` was called with a blank topic or an out-of-range depth
    #[error("Invalid research request: {0}")]
    InvalidRequest(String),

    /// The backend answered the request with a non-success status
    #[error("{message}")]
    HttpStatus { status: u16, message: String },

    /// The backend answered without a body to stream
    #[error("No response body")]
    NoResponseBody,

    /// Connection failed, or the stream broke while reading
    #[error("{0}")]
    Transport(#[from] HttpError),

    /// The backend sent an `error` event
    #[error("{0}")]
    Backend(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl SessionError {
    /// Build the error for a non-success response from its status and body.
    ///
    /// FastAPI style bodies carry a `detail` field: a string for explicit
    /// `HTTPException`s, a list of `{msg, ...}` objects for validation
    /// failures. Anything else falls back to a generic message.
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("detail").and_then(detail_message))
            .unwrap_or_else(|| format!("HTTP error: {}", status));
        SessionError::HttpStatus { status, message }
    }

    /// Build the error for a backend `error` event. A blank message becomes
    /// `"Unknown error"`.
    pub fn backend(message: &str) -> Self {
        if message.trim().is_empty() {
            SessionError::Backend("Unknown error".to_string())
        } else {
            SessionError::Backend(message.to_string())
        }
    }

    /// Returns the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            SessionError::InvalidRequest(_) => ErrorCategory::Client,
            SessionError::HttpStatus { status, .. } if *status >= 500 => ErrorCategory::Server,
            SessionError::HttpStatus { .. } => ErrorCategory::Client,
            SessionError::NoResponseBody | SessionError::Backend(_) => ErrorCategory::Server,
            SessionError::Transport(HttpError::Cancelled) => ErrorCategory::Cancelled,
            SessionError::Transport(HttpError::InvalidUrl(_)) | SessionError::Config(_) => {
                ErrorCategory::Configuration
            }
            SessionError::Transport(_) => ErrorCategory::Network,
        }
    }

    /// Returns true if starting the same session again may succeed.
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }

    /// Returns true if this is a cancellation rather than a failure.
    pub fn is_cancelled(&self) -> bool {
        self.category() == ErrorCategory::Cancelled
    }

    /// Message shown to the user and stored as `error_message`.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

fn detail_message(detail: &serde_json::Value) -> Option<String> {
    match detail {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_uses_detail() {
        let err = SessionError::from_status(500, br#"{"detail":"quota exceeded"}"#);
        assert_eq!(
            err,
            SessionError::HttpStatus {
                status: 500,
                message: "quota exceeded".to_string()
            }
        );
        assert_eq!(err.user_message(), "quota exceeded");
    }

    #[test]
    fn test_from_status_validation_detail() {
        let body = br#"{"detail":[{"loc":["body","topic"],"msg":"field required","type":"missing"}]}"#;
        let err = SessionError::from_status(422, body);
        assert_eq!(err.user_message(), "field required");
        assert_eq!(err.category(), ErrorCategory::Client);
    }

    #[test]
    fn test_from_status_falls_back_to_generic_message() {
        assert_eq!(
            SessionError::from_status(502, b"<html>Bad Gateway</html>").user_message(),
            "HTTP error: 502"
        );
        assert_eq!(
            SessionError::from_status(503, b"").user_message(),
            "HTTP error: 503"
        );
        assert_eq!(
            SessionError::from_status(500, br#"{"detail":""}"#).user_message(),
            "HTTP error: 500"
        );
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            SessionError::from_status(500, b"").category(),
            ErrorCategory::Server
        );
        assert_eq!(
            SessionError::from_status(400, b"").category(),
            ErrorCategory::Client
        );
        assert_eq!(
            SessionError::Transport(HttpError::ConnectionFailed("refused".to_string())).category(),
            ErrorCategory::Network
        );
        assert_eq!(
            SessionError::Transport(HttpError::InvalidUrl("x".to_string())).category(),
            ErrorCategory::Configuration
        );
        assert!(SessionError::Transport(HttpError::Cancelled).is_cancelled());
        assert!(!SessionError::NoResponseBody.is_cancelled());
    }

    #[test]
    fn test_retryable() {
        assert!(SessionError::Transport(HttpError::Timeout("30s".to_string())).is_retryable());
        assert!(SessionError::Backend("LLM failed".to_string()).is_retryable());
        assert!(!SessionError::InvalidRequest("blank topic".to_string()).is_retryable());
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(SessionError::NoResponseBody.user_message(), "No response body");
        assert_eq!(
            SessionError::Transport(HttpError::Io("connection reset".to_string())).user_message(),
            "IO error: connection reset"
        );
        assert_eq!(
            SessionError::Backend("search API down".to_string()).user_message(),
            "search API down"
        );
    }

    #[test]
    fn test_backend_constructor() {
        assert_eq!(
            SessionError::backend("quota exceeded"),
            SessionError::Backend("quota exceeded".to_string())
        );
        assert_eq!(SessionError::backend("").user_message(), "Unknown error");
        assert_eq!(SessionError::backend("  ").user_message(), "Unknown error");
        assert_eq!(SessionError::backend("x").category(), ErrorCategory::Server);
    }
}
