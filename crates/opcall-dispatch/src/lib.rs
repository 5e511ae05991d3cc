//! Registry-driven dispatch of form operations to HTTP endpoints.
//!
//! A caller names an operation (`sum`, `create-person`, ...) and supplies raw
//! operands as they were collected from the user. The dispatcher validates
//! them against the [`OperationRegistry`], builds the JSON body described by
//! the operation's endpoint, issues exactly one request through a
//! [`Transport`], and reports the outcome as an [`OperationResult`].
//!
//! ## Endpoints
//!
//! The standard registry targets two endpoints:
//!
//! ```json
//! POST /calculator     {"operation":"sum","number1":40,"number2":2}
//! POST /create-people  {"name":"Ada","age":36}
//! ```
//!
//! Both answer with a plain-text body on success. Any non-2xx status is a
//! failure and the body is left unread.
//!
//! ## Errors
//!
//! Validation problems are reported before any network activity. Transport
//! and server failures are folded into [`OperationResult::Failure`] by
//! [`Dispatcher::dispatch`]; [`Dispatcher::try_dispatch`] exposes the typed
//! [`DispatchError`] instead.

mod dispatcher;
mod errors;
mod operands;
mod registry;
mod request;
mod result;
pub mod transport;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use dispatcher::{DISPATCH_TARGET, Dispatcher};
pub use errors::{DispatchError, ErrorKind};
pub use operands::{OperandValue, RawOperands};
pub use registry::{
    EndpointDescriptor, OperandKind, OperandSpec, OperationRegistry, OperationRegistryBuilder,
    OperationSpec,
};
pub use request::OperationRequest;
pub use result::OperationResult;
pub use transport::{
    HttpResponse, HttpTransport, Transport, TransportError, TransportRequest, TransportResponse,
};
