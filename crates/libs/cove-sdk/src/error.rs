//! The SDK error type shared by the session layer and the facade client.

use cove_model::ValidationError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Everything that can go wrong while talking to the Cove shell.
///
/// Serializable so the host can carry one of these inside a fault reply and
/// so embedders can log or persist failures verbatim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum CoveError {
    /// The Cove shell is not installed on this machine.
    #[error("the Cove shell is not installed")]
    HostNotInstalled,

    /// The installed shell is older than the version the caller requires.
    #[error("installed Cove version {found} is older than required version {required}")]
    IncompatibleVersion { required: String, found: String },

    /// The calling application has not been granted presentation rights.
    #[error("application is not authorized to present Cove surfaces")]
    NotAuthorized,

    /// A descriptor failed validation before it was sent anywhere.
    #[error("invalid descriptor: {reason}")]
    InvalidDescriptor { reason: String },

    /// The channel to the shell could not be opened, or died mid-request.
    #[error("connection to the Cove shell failed: {}", .cause.as_deref().unwrap_or("channel unavailable"))]
    ConnectionFailed { cause: Option<String> },

    /// The shell is running but refused to service the request right now.
    #[error("the Cove shell is temporarily unavailable")]
    ServiceUnavailable,

    /// The shell enforces a cap on concurrently presented entities.
    #[error("concurrent entity limit of {limit} exceeded")]
    LimitExceeded { limit: u32 },

    /// A fault the SDK does not recognize. Carries the host's own wording.
    #[error("host reported an error: {message}")]
    Unknown { message: String },
}

impl CoveError {
    pub(crate) fn invalid_descriptor(reason: impl std::fmt::Display) -> Self {
        Self::InvalidDescriptor {
            reason: reason.to_string(),
        }
    }

    pub(crate) fn connection_failed(cause: impl std::fmt::Display) -> Self {
        Self::ConnectionFailed {
            cause: Some(cause.to_string()),
        }
    }

    /// Whether retrying the same request later could plausibly succeed
    /// without the caller changing anything.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. } | Self::ServiceUnavailable
        )
    }
}

impl From<ValidationError> for CoveError {
    fn from(err: ValidationError) -> Self {
        Self::invalid_descriptor(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(CoveError::ConnectionFailed { cause: None }.is_retryable());
        assert!(CoveError::ServiceUnavailable.is_retryable());
        assert!(!CoveError::NotAuthorized.is_retryable());
        assert!(!CoveError::HostNotInstalled.is_retryable());
        assert!(!CoveError::LimitExceeded { limit: 8 }.is_retryable());
    }

    #[test]
    fn display_includes_connection_cause() {
        let err = CoveError::connection_failed("socket gone");
        assert!(err.to_string().contains("socket gone"));

        let bare = CoveError::ConnectionFailed { cause: None };
        assert!(bare.to_string().contains("channel unavailable"));
    }

    #[test]
    fn validation_errors_become_invalid_descriptor() {
        let model_err = cove_model::IconDescriptor::symbol("").validate().unwrap_err();
        let err = CoveError::from(model_err);
        assert!(matches!(err, CoveError::InvalidDescriptor { .. }));
    }
}
