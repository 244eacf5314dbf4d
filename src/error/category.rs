//! Error category classification.
//!
//! Coarse classes that decide how a session failure is presented and
//! whether starting over is likely to help.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connection, DNS, timeout, or a dropped stream.
    /// Generally transient and retryable.
    Network,

    /// Backend reported failure (HTTP 5xx or an `error` event).
    /// Generally transient and retryable after delay.
    Server,

    /// Request rejected by the backend (HTTP 4xx) or invalid input.
    /// Not retryable until the input changes.
    Client,

    /// The session was cancelled by the caller. Not a failure.
    Cancelled,

    /// Missing or invalid settings.
    /// Not retryable until configuration is corrected.
    Configuration,
}

impl ErrorCategory {
    /// Returns true if errors in this category are generally transient
    /// and the operation can be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Server => "server",
            ErrorCategory::Client => "client",
            ErrorCategory::Cancelled => "cancelled",
            ErrorCategory::Configuration => "configuration",
        }
    }

    /// Returns suggested recovery actions for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check that the research backend is reachable and try again",
            ErrorCategory::Server => {
                "The research backend may be experiencing issues. Please try again later"
            }
            ErrorCategory::Client => "Please check the topic and depth and try again",
            ErrorCategory::Cancelled => "Start a new research session",
            ErrorCategory::Configuration => "Check the backend URL setting",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_retryable() {
        assert!(ErrorCategory::Network.is_retryable());
        assert!(ErrorCategory::Server.is_retryable());
        assert!(!ErrorCategory::Client.is_retryable());
        assert!(!ErrorCategory::Cancelled.is_retryable());
        assert!(!ErrorCategory::Configuration.is_retryable());
    }

    #[test]
    fn test_category_display() {
        assert_eq!(ErrorCategory::Network.to_string(), "network");
        assert_eq!(ErrorCategory::Cancelled.to_string(), "cancelled");
    }

    #[test]
    fn test_recovery_hints_not_empty() {
        for category in [
            ErrorCategory::Network,
            ErrorCategory::Server,
            ErrorCategory::Client,
            ErrorCategory::Cancelled,
            ErrorCategory::Configuration,
        ] {
            assert!(!category.recovery_hint().is_empty());
        }
    }
}
