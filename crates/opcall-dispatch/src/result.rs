//! The single success/failure channel reported to the UI layer.

use serde::{Deserialize, Serialize};

use crate::errors::DispatchError;

/// Outcome of one dispatch.
///
/// Serialises as `{"status":"success","body":...}` or
/// `{"status":"failure","reason":...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OperationResult {
    /// The server accepted the request; `body` is its plain-text response.
    Success {
        /// Response body text.
        body: String,
    },
    /// Validation, transport, or server failure.
    Failure {
        /// Human-readable reason.
        reason: String,
    },
}

impl OperationResult {
    /// Creates a success result.
    pub fn success(body: impl Into<String>) -> Self {
        Self::Success { body: body.into() }
    }

    /// Creates a failure result.
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }

    /// Returns true for [`OperationResult::Success`].
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Converts into a `Result` so callers can use `?`.
    ///
    /// # Errors
    ///
    /// Returns the failure reason for [`OperationResult::Failure`].
    pub fn into_result(self) -> Result<String, String> {
        match self {
            Self::Success { body } => Ok(body),
            Self::Failure { reason } => Err(reason),
        }
    }
}

impl From<Result<String, DispatchError>> for OperationResult {
    fn from(result: Result<String, DispatchError>) -> Self {
        match result {
            Ok(body) => Self::success(body),
            Err(error) => Self::failure(error.to_string()),
        }
    }
}
