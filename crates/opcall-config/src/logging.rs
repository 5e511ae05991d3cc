//! Log record formats for the CLI's stderr sink.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How log records are written to stderr.
///
/// Parsed case-insensitively from `--log-format`, `OPCALL_LOG_FORMAT`, or the
/// `log_format` key of a configuration file.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One terse line per event, coloured on terminals.
    #[default]
    Compact,
    /// One flattened JSON object per event.
    Json,
}

impl LogFormat {
    /// Returns `true` when records are machine-readable and must never carry
    /// ANSI colour codes.
    #[must_use]
    pub const fn is_structured(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Error returned when a [`LogFormat`] name is not recognised.
pub type LogFormatParseError = strum::ParseError;
