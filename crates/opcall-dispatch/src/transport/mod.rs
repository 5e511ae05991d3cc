//! Transport seam between the dispatcher and the network.
//!
//! The dispatcher only needs to send one request and, on success, read one
//! body. [`Transport`] captures exactly that so production code can use
//! [`HttpTransport`] while tests substitute a scripted double.

mod client;
mod errors;

use std::future::Future;

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};

pub use self::client::{HttpResponse, HttpTransport};
pub use self::errors::TransportError;

/// A single outgoing request.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute endpoint path, resolved by the transport.
    pub path: String,
    /// Request headers.
    pub headers: HeaderMap,
    /// Encoded request body.
    pub body: Bytes,
}

/// A response whose body has not been read yet.
pub trait TransportResponse: Send {
    /// Returns the response status.
    fn status(&self) -> StatusCode;

    /// Reads the whole body as text.
    ///
    /// Invalid UTF-8 sequences are replaced rather than rejected.
    fn text(self) -> impl Future<Output = Result<String, TransportError>> + Send;
}

/// Sends requests on behalf of the dispatcher.
///
/// Implementations must issue exactly one network call per [`send`] and
/// must not retry.
///
/// [`send`]: Transport::send
pub trait Transport {
    /// Response type produced by this transport.
    type Response: TransportResponse;

    /// Sends `request` and resolves once response headers are available.
    fn send(
        &self,
        request: TransportRequest,
    ) -> impl Future<Output = Result<Self::Response, TransportError>> + Send;
}

impl<T: Transport> Transport for &T {
    type Response = T::Response;

    fn send(
        &self,
        request: TransportRequest,
    ) -> impl Future<Output = Result<Self::Response, TransportError>> + Send {
        (**self).send(request)
    }
}
