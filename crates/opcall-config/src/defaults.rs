use crate::endpoint::ServerEndpoint;
use crate::logging::LogFormat;

/// Default host for the operation server.
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Default TCP port for the operation server.
pub const DEFAULT_SERVER_PORT: u16 = 7878;

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Default log filter expression used by the binary.
#[must_use]
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binary.
#[must_use]
pub fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Computes the default server endpoint, `http://127.0.0.1:7878/`.
#[must_use]
#[allow(
    clippy::expect_used,
    reason = "the built-in host and port always form a valid http URL"
)]
pub fn default_server_endpoint() -> ServerEndpoint {
    ServerEndpoint::http(DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT)
        .expect("default server endpoint should parse")
}
