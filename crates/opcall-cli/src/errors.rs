//! Error types for the CLI runtime.

use std::io;
use std::sync::Arc;

use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("the operation must be provided")]
    MissingOperation,
    #[error("operand '{0}' must be written as KEY=VALUE")]
    MalformedOperand(String),
    #[error("operand '{0}' has an empty key")]
    EmptyOperandKey(String),
    #[error("operand '{0}' was supplied more than once")]
    DuplicateOperand(String),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(serde_json::Error),
    #[error("failed to write output: {0}")]
    EmitOutput(io::Error),
}
