//! Shared configuration for the opcall command-line client.
//!
//! Configuration is layered by `ortho_config`: built-in defaults, then an
//! optional TOML file (`--config-path` or `OPCALL_CONFIG_PATH`), then
//! `OPCALL_*` environment variables, and finally command-line flags.

mod defaults;
mod endpoint;
mod logging;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, default_log_filter,
    default_log_filter_string, default_log_format, default_server_endpoint,
};
pub use endpoint::{EndpointParseError, ServerEndpoint};
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "OPCALL")]
pub struct Config {
    /// Base URL of the server hosting the operation endpoints.
    #[ortho_config(default = default_server_endpoint())]
    pub base_url: ServerEndpoint,
    /// Tracing filter expression, for example `opcall_dispatch=debug`.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format for log records written to stderr.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
}

impl Config {
    /// Returns the configured server endpoint.
    #[must_use]
    pub fn base_url(&self) -> &ServerEndpoint {
        &self.base_url
    }

    /// Returns the configured log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Returns the configured log format.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_server_endpoint(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}
