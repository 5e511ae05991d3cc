//! Plain-HTTP transport backed by the `hyper-util` pooled client.

use std::fmt;

use bytes::Bytes;
use http::{Request, Response, StatusCode, Uri};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use url::Url;

use super::{Transport, TransportError, TransportRequest, TransportResponse};

/// Sends requests to endpoint paths resolved against a base URL.
///
/// The underlying client pools connections and is cheap to clone. No
/// timeout is applied; a call waits until the server answers or the
/// connection fails. Requires a tokio runtime.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client<HttpConnector, Full<Bytes>>,
    base_url: Url,
}

impl HttpTransport {
    /// Creates a transport for the server at `base_url`.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        let client = Client::builder(TokioExecutor::new()).build_http();
        Self { client, base_url }
    }

    /// Returns the base URL endpoint paths are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn resolve(&self, path: &str) -> Result<Uri, TransportError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|error| TransportError::with_source("invalid endpoint path", error))?;
        url.as_str()
            .parse::<Uri>()
            .map_err(|error| TransportError::with_source("invalid endpoint URI", error))
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("HttpTransport")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl Transport for HttpTransport {
    type Response = HttpResponse;

    async fn send(&self, request: TransportRequest) -> Result<HttpResponse, TransportError> {
        let TransportRequest {
            method,
            path,
            headers,
            body,
        } = request;
        let uri = self.resolve(&path)?;

        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(target) = builder.headers_mut() {
            target.extend(headers);
        }
        let outgoing = builder
            .body(Full::new(body))
            .map_err(|error| TransportError::with_source("failed to build request", error))?;

        let response = self
            .client
            .request(outgoing)
            .await
            .map_err(|error| TransportError::with_source("request failed", error))?;
        Ok(HttpResponse { inner: response })
    }
}

/// Response returned by [`HttpTransport`]; the body streams on demand.
#[derive(Debug)]
pub struct HttpResponse {
    inner: Response<Incoming>,
}

impl TransportResponse for HttpResponse {
    fn status(&self) -> StatusCode {
        self.inner.status()
    }

    async fn text(self) -> Result<String, TransportError> {
        let collected = self
            .inner
            .into_body()
            .collect()
            .await
            .map_err(|error| TransportError::with_source("failed to read response body", error))?;
        Ok(String::from_utf8_lossy(&collected.to_bytes()).into_owned())
    }
}
