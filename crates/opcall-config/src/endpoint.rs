use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Base URL of the HTTP server that hosts the operation endpoints.
///
/// The transport resolves endpoint paths such as `/calculator` against this
/// URL, so a base of `http://127.0.0.1:7878/app/` still posts to
/// `http://127.0.0.1:7878/calculator`. Only plain `http` is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServerEndpoint {
    url: Url,
}

impl ServerEndpoint {
    /// Builds an endpoint for `http://{host}:{port}/`.
    ///
    /// # Errors
    ///
    /// Returns [`EndpointParseError`] when the host cannot form a valid URL.
    pub fn http(host: &str, port: u16) -> Result<Self, EndpointParseError> {
        format!("http://{host}:{port}/").parse()
    }

    /// Returns the parsed base URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl fmt::Display for ServerEndpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.url.as_str())
    }
}

impl FromStr for ServerEndpoint {
    type Err = EndpointParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let url = Url::parse(input.trim())?;
        if url.scheme() != "http" {
            return Err(EndpointParseError::UnsupportedScheme(
                url.scheme().to_owned(),
            ));
        }
        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(EndpointParseError::MissingHost(input.to_owned()));
        }
        Ok(Self { url })
    }
}

impl TryFrom<String> for ServerEndpoint {
    type Error = EndpointParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ServerEndpoint> for String {
    fn from(endpoint: ServerEndpoint) -> Self {
        endpoint.url.into()
    }
}

/// Errors encountered while parsing a [`ServerEndpoint`] from text.
#[derive(Debug, Error)]
pub enum EndpointParseError {
    /// Scheme was not `http`.
    #[error("unsupported server scheme '{0}'; only http is supported")]
    UnsupportedScheme(String),
    /// The URL had no host to connect to.
    #[error("missing server host in '{0}'")]
    MissingHost(String),
    /// URL failed to parse.
    #[error(transparent)]
    Url(#[from] url::ParseError),
}
