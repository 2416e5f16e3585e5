//! Error types for the feedback console.

use std::fmt;

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of a failed fetch.
///
/// Callers use this to choose between an empty state and an error banner
/// without matching on the full error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Unreachable,
    Timeout,
    BadStatus,
    MalformedPayload,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::Unreachable => "UNREACHABLE",
            FailureKind::Timeout => "TIMEOUT",
            FailureKind::BadStatus => "BAD_STATUS",
            FailureKind::MalformedPayload => "MALFORMED_PAYLOAD",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur in the feedback console.
#[derive(Error, Debug)]
pub enum Error {
    /// Connection could not be established
    #[error("API unreachable: {0}")]
    Unreachable(String),

    /// Request exceeded its time bound
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Response received with a non-200 status
    #[error("Unexpected status {status}: {body}")]
    BadStatus { status: u16, body: String },

    /// Response body did not match the expected JSON shape
    #[error("Malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Authentication error
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Fetch failure kind, or `None` for errors that did not come from a fetch.
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            Error::Unreachable(_) => Some(FailureKind::Unreachable),
            Error::Timeout(_) => Some(FailureKind::Timeout),
            Error::BadStatus { .. } => Some(FailureKind::BadStatus),
            Error::MalformedPayload(_) => Some(FailureKind::MalformedPayload),
            Error::Config(_) | Error::Auth(_) | Error::Internal(_) => None,
        }
    }

    /// Classify a transport-level reqwest error.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout(err.to_string())
        } else {
            // Refused connections, DNS failures and bodies cut off mid-read
            // all leave the caller without a usable response.
            Error::Unreachable(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_errors_have_kinds() {
        assert_eq!(
            Error::Unreachable("refused".into()).kind(),
            Some(FailureKind::Unreachable)
        );
        assert_eq!(
            Error::Timeout("10s".into()).kind(),
            Some(FailureKind::Timeout)
        );
        assert_eq!(
            Error::BadStatus {
                status: 503,
                body: String::new()
            }
            .kind(),
            Some(FailureKind::BadStatus)
        );

        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(
            Error::from(parse_err).kind(),
            Some(FailureKind::MalformedPayload)
        );
    }

    #[test]
    fn test_non_fetch_errors_have_no_kind() {
        assert_eq!(Error::Config("API_KEY not set".into()).kind(), None);
        assert_eq!(Error::Auth("denied".into()).kind(), None);
    }

    #[test]
    fn test_bad_status_message() {
        let err = Error::BadStatus {
            status: 401,
            body: "invalid key".into(),
        };
        assert_eq!(err.to_string(), "Unexpected status 401: invalid key");
    }
}
