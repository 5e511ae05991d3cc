//! Scripted transport double for dispatcher tests.
//!
//! Replies are keyed by endpoint path. Every call is recorded with its decoded
//! JSON body so tests can assert on exactly what would have gone over the
//! wire.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use http::header::CONTENT_TYPE;
use http::{Method, StatusCode};
use serde_json::Value;

use crate::operands::RawOperands;
use crate::transport::{Transport, TransportError, TransportRequest, TransportResponse};

/// Converts a JSON object literal into [`RawOperands`].
///
/// # Panics
///
/// Panics when `value` is not a JSON object.
#[must_use]
pub fn raw_operands(value: Value) -> RawOperands {
    match value {
        Value::Object(map) => map,
        other => panic!("operands must be a JSON object, got {other}"),
    }
}

/// A request observed by [`ScriptedTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// HTTP method.
    pub method: Method,
    /// Endpoint path.
    pub path: String,
    /// `Content-Type` header, when present and valid UTF-8.
    pub content_type: Option<String>,
    /// Body decoded as JSON (`Null` when it is not JSON).
    pub body: Value,
}

#[derive(Debug, Clone)]
enum Reply {
    Respond {
        status: StatusCode,
        body: String,
        delay: Duration,
    },
    Reject {
        message: String,
    },
    FailBody {
        message: String,
    },
}

#[derive(Debug, Default)]
struct State {
    replies: HashMap<String, Reply>,
    calls: Vec<RecordedCall>,
}

/// Transport double with per-path scripted replies.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    state: Arc<Mutex<State>>,
    body_reads: Arc<AtomicUsize>,
}

impl ScriptedTransport {
    /// Creates a transport with no scripted replies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers requests to `path` with `status` and `body`.
    pub fn respond(&self, path: &str, status: StatusCode, body: &str) {
        self.respond_after(path, status, body, Duration::ZERO);
    }

    /// Answers requests to `path` after waiting for `delay`.
    pub fn respond_after(&self, path: &str, status: StatusCode, body: &str, delay: Duration) {
        self.script(
            path,
            Reply::Respond {
                status,
                body: body.to_owned(),
                delay,
            },
        );
    }

    /// Fails requests to `path` as if the connection could not be made.
    pub fn reject(&self, path: &str, message: &str) {
        self.script(
            path,
            Reply::Reject {
                message: message.to_owned(),
            },
        );
    }

    /// Answers `path` with 200 but fails when the body is read.
    pub fn fail_body(&self, path: &str, message: &str) {
        self.script(
            path,
            Reply::FailBody {
                message: message.to_owned(),
            },
        );
    }

    /// Returns every recorded call in arrival order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// Returns how many response bodies were read.
    #[must_use]
    pub fn body_reads(&self) -> usize {
        self.body_reads.load(Ordering::SeqCst)
    }

    fn script(&self, path: &str, reply: Reply) {
        self.lock().replies.insert(path.to_owned(), reply);
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, request: &TransportRequest) -> Option<Reply> {
        let call = RecordedCall {
            method: request.method.clone(),
            path: request.path.clone(),
            content_type: request
                .headers
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned),
            body: serde_json::from_slice(&request.body).unwrap_or(Value::Null),
        };
        let mut state = self.lock();
        state.calls.push(call);
        state.replies.get(&request.path).cloned()
    }
}

impl Transport for ScriptedTransport {
    type Response = ScriptedResponse;

    async fn send(&self, request: TransportRequest) -> Result<ScriptedResponse, TransportError> {
        let reply = self.record(&request).ok_or_else(|| {
            TransportError::new(format!("no scripted reply for {}", request.path))
        })?;
        match reply {
            Reply::Respond {
                status,
                body,
                delay,
            } => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(ScriptedResponse {
                    status,
                    body: Ok(body),
                    reads: Arc::clone(&self.body_reads),
                })
            }
            Reply::Reject { message } => Err(TransportError::new(message)),
            Reply::FailBody { message } => Ok(ScriptedResponse {
                status: StatusCode::OK,
                body: Err(message),
                reads: Arc::clone(&self.body_reads),
            }),
        }
    }
}

/// Response produced by [`ScriptedTransport`].
#[derive(Debug)]
pub struct ScriptedResponse {
    status: StatusCode,
    body: Result<String, String>,
    reads: Arc<AtomicUsize>,
}

impl TransportResponse for ScriptedResponse {
    fn status(&self) -> StatusCode {
        self.status
    }

    async fn text(self) -> Result<String, TransportError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.body.map_err(TransportError::new)
    }
}
