//! Failure classification for remote correction calls
//!
//! The remote client's exception types are never inspected. Instead the
//! stringified failure is matched case-insensitively against keyword groups,
//! in priority order:
//!
//! authentication > rate limit > connection/network/timeout >
//! service unavailable > unknown

use std::fmt;

const AUTH_KEYWORDS: &[&str] = &["authentication", "unauthorized", "auth", "401"];
const RATE_LIMIT_KEYWORDS: &[&str] = &["rate limit", "too many requests", "429"];
const TIMEOUT_KEYWORDS: &[&str] = &["timeout", "timed out"];
const CONNECTION_KEYWORDS: &[&str] = &["connection", "network"];
const UNAVAILABLE_KEYWORDS: &[&str] = &["service unavailable", "server error", "502", "503"];

/// Category of a failed correction attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Timeout,
    ConnectionFailure,
    RateLimited,
    ServiceUnavailable,
    AuthenticationFailure,
    EmptyResponse,
    Unknown,
}

impl ErrorKind {
    /// Whether a failure of this kind may be retried
    pub const fn is_retryable(&self) -> bool {
        self.backoff_factor().is_some()
    }

    /// Multiplier applied to the standard backoff, `None` if not retryable
    pub const fn backoff_factor(&self) -> Option<u32> {
        match self {
            Self::RateLimited => Some(2),
            Self::Timeout | Self::ConnectionFailure | Self::ServiceUnavailable => Some(1),
            Self::AuthenticationFailure | Self::EmptyResponse | Self::Unknown => None,
        }
    }

    /// Status line shown to the user when a correction ends with this kind
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::ConnectionFailure => "Error: could not connect to the correction service.",
            Self::Timeout => "Error: the correction service timed out.",
            Self::AuthenticationFailure => "Error: invalid API key.",
            Self::RateLimited => "Error: correction service usage limit exceeded.",
            Self::ServiceUnavailable => "Error: correction service unavailable.",
            Self::EmptyResponse => "Error: failed to get a correction from the AI.",
            Self::Unknown => "Error: correction service request failed.",
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::ConnectionFailure => "connection failure",
            Self::RateLimited => "rate limited",
            Self::ServiceUnavailable => "service unavailable",
            Self::AuthenticationFailure => "authentication failure",
            Self::EmptyResponse => "empty response",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| haystack.contains(k))
}

/// Classify a failure message into an [`ErrorKind`].
///
/// Pure function; the first matching keyword group wins.
pub fn classify(error_message: &str) -> ErrorKind {
    let message = error_message.to_lowercase();

    if contains_any(&message, AUTH_KEYWORDS) {
        ErrorKind::AuthenticationFailure
    } else if contains_any(&message, RATE_LIMIT_KEYWORDS) {
        ErrorKind::RateLimited
    } else if contains_any(&message, TIMEOUT_KEYWORDS) {
        ErrorKind::Timeout
    } else if contains_any(&message, CONNECTION_KEYWORDS) {
        ErrorKind::ConnectionFailure
    } else if contains_any(&message, UNAVAILABLE_KEYWORDS) {
        ErrorKind::ServiceUnavailable
    } else {
        ErrorKind::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_markers_are_fatal() {
        for msg in [
            "Error code: 401 - invalid key",
            "AuthenticationError: bad key",
            "401 Unauthorized",
            "authentication failed after timeout",
        ] {
            let kind = classify(msg);
            assert_eq!(kind, ErrorKind::AuthenticationFailure, "{msg}");
            assert!(!kind.is_retryable());
        }
    }

    #[test]
    fn auth_beats_rate_limit() {
        assert_eq!(
            classify("401 and also 429 too many requests"),
            ErrorKind::AuthenticationFailure
        );
    }

    #[test]
    fn rate_limit_markers() {
        for msg in ["Rate limit reached", "HTTP 429", "Too Many Requests"] {
            assert_eq!(classify(msg), ErrorKind::RateLimited, "{msg}");
        }
        assert_eq!(ErrorKind::RateLimited.backoff_factor(), Some(2));
    }

    #[test]
    fn rate_limit_beats_connection() {
        assert_eq!(
            classify("connection dropped: 429"),
            ErrorKind::RateLimited
        );
    }

    #[test]
    fn timeout_and_connection_markers() {
        assert_eq!(classify("Request timeout"), ErrorKind::Timeout);
        assert_eq!(classify("operation timed out"), ErrorKind::Timeout);
        assert_eq!(classify("Connection reset by peer"), ErrorKind::ConnectionFailure);
        assert_eq!(classify("network unreachable"), ErrorKind::ConnectionFailure);
        assert_eq!(ErrorKind::Timeout.backoff_factor(), Some(1));
        assert_eq!(ErrorKind::ConnectionFailure.backoff_factor(), Some(1));
    }

    #[test]
    fn timeout_beats_service_unavailable() {
        assert_eq!(
            classify("503 service unavailable: upstream timeout"),
            ErrorKind::Timeout
        );
    }

    #[test]
    fn service_unavailable_markers() {
        for msg in [
            "503 Service Unavailable",
            "HTTP 502 Bad Gateway",
            "500 Internal Server Error",
        ] {
            assert_eq!(classify(msg), ErrorKind::ServiceUnavailable, "{msg}");
        }
        assert!(ErrorKind::ServiceUnavailable.is_retryable());
    }

    #[test]
    fn anything_else_is_unknown_and_fatal() {
        let kind = classify("KeyError: 'choices'");
        assert_eq!(kind, ErrorKind::Unknown);
        assert!(!kind.is_retryable());
        assert!(!ErrorKind::EmptyResponse.is_retryable());
    }

    #[test]
    fn every_kind_has_a_user_message() {
        let kinds = [
            ErrorKind::Timeout,
            ErrorKind::ConnectionFailure,
            ErrorKind::RateLimited,
            ErrorKind::ServiceUnavailable,
            ErrorKind::AuthenticationFailure,
            ErrorKind::EmptyResponse,
            ErrorKind::Unknown,
        ];
        for kind in kinds {
            assert!(kind.user_message().starts_with("Error:"));
        }
    }
}
