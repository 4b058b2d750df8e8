//! Error types for the prediction workflow
//!
//! Validation errors never leave the client. Transport errors cover every
//! way a request can fail to produce a structured answer from the service.

use thiserror::Error;

/// Message shown for any transport failure. Raw detail goes to the log only.
pub const NETWORK_ERROR: &str = "Network error";

/// Message shown when the service rejects a request without saying why.
pub const REQUEST_FAILED: &str = "Request failed";

/// Message shown when the user aborts an in-flight request.
pub const REQUEST_CANCELLED: &str = "Request cancelled";

/// Local form validation failure; no request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Keyword is required")]
    EmptyKeyword,
    #[error("Days to predict is required")]
    MissingHorizon,
    #[error("Days to predict must be a whole number")]
    InvalidHorizon(String),
    #[error("Days to predict must be at least 1")]
    NonPositiveHorizon(i64),
}

/// Why a submit did not produce a request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("a prediction request is already in flight")]
    AlreadyPending,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// The service could not be reached, or answered with something unreadable.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("failed to reach prediction service: {0}")]
    Send(#[source] reqwest::Error),
    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("request task ended without a result")]
    Lost,
    #[error("service answered HTTP {0}")]
    Status(u16),
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl TransportError {
    /// Classify a reqwest failure raised while sending
    pub fn from_send(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Send(err)
        }
    }

    /// Classify a reqwest failure raised while reading the body
    pub fn from_body(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Body(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_are_user_facing() {
        assert_eq!(ValidationError::EmptyKeyword.to_string(), "Keyword is required");
        assert_eq!(
            ValidationError::NonPositiveHorizon(0).to_string(),
            "Days to predict must be at least 1"
        );
        assert_eq!(
            ValidationError::InvalidHorizon("abc".to_string()).to_string(),
            "Days to predict must be a whole number"
        );
    }

    #[test]
    fn test_decode_error_converts() {
        let err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let transport: TransportError = err.into();
        assert!(matches!(transport, TransportError::Decode(_)));
    }
}
