//! Rendering of operation results.
//!
//! Human output writes the success body to stdout and the failure reason to
//! stderr. JSON output writes the serialised [`OperationResult`] to stdout in
//! both cases so scripts can read a single stream.

use std::io::Write;

use clap::ValueEnum;
use opcall_dispatch::OperationResult;

use crate::errors::AppError;

/// Output format selection for operation results.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Selects `human` for terminal output and `json` for redirected output.
    #[default]
    Auto,
    /// Always render human-readable output.
    Human,
    /// Always emit the result as JSON.
    Json,
}

/// Output format after resolving `auto` based on TTY detection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResolvedOutputFormat {
    /// Plain body text or an `error:` line.
    Human,
    /// `{"status": ..., ...}` objects.
    Json,
}

impl OutputFormat {
    /// Resolves the output format based on whether stdout is a terminal.
    #[must_use]
    pub fn resolve(self, stdout_is_terminal: bool) -> ResolvedOutputFormat {
        match self {
            Self::Auto => {
                if stdout_is_terminal {
                    ResolvedOutputFormat::Human
                } else {
                    ResolvedOutputFormat::Json
                }
            }
            Self::Human => ResolvedOutputFormat::Human,
            Self::Json => ResolvedOutputFormat::Json,
        }
    }
}

pub(crate) fn render_result<W, E>(
    result: &OperationResult,
    format: ResolvedOutputFormat,
    stdout: &mut W,
    stderr: &mut E,
) -> Result<(), AppError>
where
    W: Write,
    E: Write,
{
    match (format, result) {
        (ResolvedOutputFormat::Json, _) => {
            serde_json::to_writer(&mut *stdout, result).map_err(AppError::SerialiseOutput)?;
            stdout.write_all(b"\n").map_err(AppError::EmitOutput)?;
        }
        (ResolvedOutputFormat::Human, OperationResult::Success { body }) => {
            stdout.write_all(body.as_bytes()).map_err(AppError::EmitOutput)?;
            if !body.ends_with('\n') {
                stdout.write_all(b"\n").map_err(AppError::EmitOutput)?;
            }
        }
        (ResolvedOutputFormat::Human, OperationResult::Failure { reason }) => {
            writeln!(stderr, "error: {reason}").map_err(AppError::EmitOutput)?;
        }
    }
    stdout.flush().map_err(AppError::EmitOutput)?;
    stderr.flush().map_err(AppError::EmitOutput)
}
