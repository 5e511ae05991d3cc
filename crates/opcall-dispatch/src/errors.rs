//! Error types for operation dispatch failures.
//!
//! Each variant maps to one failure mode and belongs to one of three
//! families: validation (nothing was sent), transport (the request or its
//! response body could not travel), or server (a non-2xx status came back).

use http::StatusCode;
use thiserror::Error;

use crate::registry::OperandKind;
use crate::transport::TransportError;

/// Family a [`DispatchError`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operands or operation key were rejected before any network call.
    Validation,
    /// The network call failed before a status was received, or the body
    /// could not be read.
    Transport,
    /// The server answered with a non-success status.
    Server,
}

/// Errors surfaced while validating and dispatching an operation.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Operation key is not present in the registry.
    #[error("unknown operation '{operation}'")]
    UnknownOperation { operation: String },

    /// A required operand was absent.
    #[error("missing operand '{operand}' for operation '{operation}'")]
    MissingOperand {
        operation: &'static str,
        operand: &'static str,
    },

    /// An operand was present but could not be coerced to its declared kind.
    #[error("invalid operand '{operand}' for operation '{operation}': expected {expected}, got {found}")]
    InvalidOperand {
        operation: &'static str,
        operand: &'static str,
        expected: OperandKind,
        found: String,
    },

    /// An operand was supplied that the operation does not declare.
    #[error("unexpected operand '{operand}' for operation '{operation}'")]
    UnexpectedOperand {
        operation: &'static str,
        operand: String,
    },

    /// The request body could not be encoded as JSON.
    #[error("failed to encode request body: {0}")]
    EncodeBody(#[from] serde_json::Error),

    /// Network failure before a response status was available.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// The server responded with a non-success status.
    #[error("server responded with status {status}")]
    Server { status: StatusCode },
}

impl DispatchError {
    /// Returns the failure family of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownOperation { .. }
            | Self::MissingOperand { .. }
            | Self::InvalidOperand { .. }
            | Self::UnexpectedOperand { .. }
            | Self::EncodeBody(_) => ErrorKind::Validation,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Server { .. } => ErrorKind::Server,
        }
    }

    /// Returns the process exit status the CLI uses for this error.
    ///
    /// Rejected input and server refusals return status 1. Transport
    /// failures return status 2.
    #[must_use]
    pub fn exit_status(&self) -> u8 {
        match self.kind() {
            ErrorKind::Validation | ErrorKind::Server => 1,
            ErrorKind::Transport => 2,
        }
    }

    /// Creates an unknown operation error.
    pub fn unknown_operation(operation: impl Into<String>) -> Self {
        Self::UnknownOperation {
            operation: operation.into(),
        }
    }

    /// Creates a missing operand error.
    #[must_use]
    pub fn missing_operand(operation: &'static str, operand: &'static str) -> Self {
        Self::MissingOperand { operation, operand }
    }

    /// Creates an invalid operand error.
    pub fn invalid_operand(
        operation: &'static str,
        operand: &'static str,
        expected: OperandKind,
        found: impl Into<String>,
    ) -> Self {
        Self::InvalidOperand {
            operation,
            operand,
            expected,
            found: found.into(),
        }
    }

    /// Creates an unexpected operand error.
    pub fn unexpected_operand(operation: &'static str, operand: impl Into<String>) -> Self {
        Self::UnexpectedOperand {
            operation,
            operand: operand.into(),
        }
    }

    /// Creates a server error for the given status.
    #[must_use]
    pub fn server(status: StatusCode) -> Self {
        Self::Server { status }
    }
}
