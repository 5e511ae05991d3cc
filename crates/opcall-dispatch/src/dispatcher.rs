//! The operation dispatcher.
//!
//! `dispatch` validates operands, builds the JSON body described by the
//! registry, performs one request through the transport, and reports the
//! outcome. Calls share no mutable state, so any number may be in flight at
//! once.

use http::header::{CONTENT_TYPE, HeaderValue};
use http::HeaderMap;
use tracing::debug;

use crate::errors::DispatchError;
use crate::operands::RawOperands;
use crate::registry::OperationRegistry;
use crate::request::OperationRequest;
use crate::result::OperationResult;
use crate::transport::{Transport, TransportRequest, TransportResponse};

/// Tracing target for dispatch operations.
pub const DISPATCH_TARGET: &str = concat!(env!("CARGO_CRATE_NAME"), "::dispatch");

const JSON_CONTENT_TYPE: &str = "application/json";

/// Routes operations from a registry to a transport.
#[derive(Debug, Clone)]
pub struct Dispatcher<'r, T> {
    registry: &'r OperationRegistry,
    transport: T,
}

impl<T: Transport> Dispatcher<'static, T> {
    /// Creates a dispatcher over the standard registry.
    pub fn new(transport: T) -> Self {
        Self::with_registry(OperationRegistry::standard(), transport)
    }
}

impl<'r, T: Transport> Dispatcher<'r, T> {
    /// Creates a dispatcher over a custom registry.
    pub fn with_registry(registry: &'r OperationRegistry, transport: T) -> Self {
        Self {
            registry,
            transport,
        }
    }

    /// Returns the registry operations are resolved against.
    #[must_use]
    pub fn registry(&self) -> &'r OperationRegistry {
        self.registry
    }

    /// Dispatches `operation` and folds every error into
    /// [`OperationResult::Failure`].
    pub async fn dispatch(&self, operation: &str, operands: &RawOperands) -> OperationResult {
        self.try_dispatch(operation, operands).await.into()
    }

    /// Dispatches `operation` and returns the response body.
    ///
    /// Validation happens before the first suspension point, so invalid input
    /// never reaches the transport.
    ///
    /// # Errors
    ///
    /// Returns a validation error for unknown operations or bad operands, a
    /// transport error when the request or body read fails, and a server
    /// error for non-2xx statuses.
    pub async fn try_dispatch(
        &self,
        operation: &str,
        operands: &RawOperands,
    ) -> Result<String, DispatchError> {
        let result = match self.registry.validate(operation, operands) {
            Ok(request) => self.send(request).await,
            Err(error) => Err(error),
        };
        if let Err(error) = &result {
            debug!(
                target: DISPATCH_TARGET,
                operation = operation.trim(),
                kind = ?error.kind(),
                %error,
                "dispatch failed"
            );
        }
        result
    }

    async fn send(&self, request: OperationRequest<'_>) -> Result<String, DispatchError> {
        let endpoint = request.endpoint();
        let body = serde_json::to_vec(&request.to_json_body())?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));

        debug!(
            target: DISPATCH_TARGET,
            operation = request.operation(),
            method = %endpoint.method,
            path = endpoint.path,
            "sending request"
        );

        let response = self
            .transport
            .send(TransportRequest {
                method: endpoint.method.clone(),
                path: endpoint.path.to_owned(),
                headers,
                body: body.into(),
            })
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::server(status));
        }

        let text = response.text().await?;
        debug!(
            target: DISPATCH_TARGET,
            operation = request.operation(),
            status = status.as_u16(),
            bytes = text.len(),
            "request succeeded"
        );
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex, PoisonError};
    use std::time::Duration;

    use http::StatusCode;
    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::*;
    use crate::errors::ErrorKind;
    use crate::testing::{ScriptedTransport, raw_operands};

    #[fixture]
    fn transport() -> ScriptedTransport {
        ScriptedTransport::new()
    }

    #[rstest]
    #[case::sum(
        "sum",
        json!({"number1": 40, "number2": 2}),
        "/calculator",
        json!({"operation": "sum", "number1": 40, "number2": 2})
    )]
    #[case::sub(
        "sub",
        json!({"number1": "7.5", "number2": 2}),
        "/calculator",
        json!({"operation": "sub", "number1": 7.5, "number2": 2})
    )]
    #[case::mult(
        "mult",
        json!({"number1": 6, "number2": 7}),
        "/calculator",
        json!({"operation": "mult", "number1": 6, "number2": 7})
    )]
    #[case::div(
        "div",
        json!({"number1": 84, "number2": "2"}),
        "/calculator",
        json!({"operation": "div", "number1": 84, "number2": 2})
    )]
    #[case::create_person(
        "create-person",
        json!({"name": "Ada", "age": "36"}),
        "/create-people",
        json!({"name": "Ada", "age": 36})
    )]
    #[tokio::test]
    async fn each_operation_sends_one_json_post(
        transport: ScriptedTransport,
        #[case] operation: &str,
        #[case] operands: serde_json::Value,
        #[case] path: &str,
        #[case] body: serde_json::Value,
    ) {
        transport.respond(path, StatusCode::OK, "done");
        let dispatcher = Dispatcher::new(&transport);

        let result = dispatcher.dispatch(operation, &raw_operands(operands)).await;

        assert_eq!(result, OperationResult::success("done"));
        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].path, path);
        assert_eq!(calls[0].method, http::Method::POST);
        assert_eq!(calls[0].content_type.as_deref(), Some("application/json"));
        assert_eq!(calls[0].body, body);
    }

    #[rstest]
    #[tokio::test]
    async fn server_errors_reference_status(transport: ScriptedTransport) {
        transport.respond("/calculator", StatusCode::INTERNAL_SERVER_ERROR, "boom");
        let dispatcher = Dispatcher::new(&transport);

        let result = dispatcher
            .dispatch("div", &raw_operands(json!({"number1": 1, "number2": 0})))
            .await;

        match result {
            OperationResult::Failure { reason } => assert!(reason.contains("500"), "{reason}"),
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(transport.body_reads(), 0, "failure bodies stay unread");
    }

    #[rstest]
    #[tokio::test]
    async fn transport_rejection_becomes_failure(transport: ScriptedTransport) {
        transport.reject("/create-people", "connection refused");
        let dispatcher = Dispatcher::new(&transport);

        let error = dispatcher
            .try_dispatch(
                "create-person",
                &raw_operands(json!({"name": "Ada", "age": 36})),
            )
            .await
            .expect_err("transport failure");

        assert_eq!(error.kind(), ErrorKind::Transport);
        assert!(error.to_string().contains("connection refused"));
    }

    #[rstest]
    #[tokio::test]
    async fn body_read_failure_is_transport_failure(transport: ScriptedTransport) {
        transport.fail_body("/calculator", "connection reset");
        let dispatcher = Dispatcher::new(&transport);

        let error = dispatcher
            .try_dispatch("mult", &raw_operands(json!({"number1": 2, "number2": 3})))
            .await
            .expect_err("body failure");

        assert_eq!(error.kind(), ErrorKind::Transport);
    }

    #[rstest]
    #[case::unknown("pow", json!({"number1": 1, "number2": 2}))]
    #[case::missing("sum", json!({"number1": 1}))]
    #[case::malformed("sub", json!({"number1": "one", "number2": 2}))]
    #[case::missing_age("create-person", json!({"name": "Ada"}))]
    #[tokio::test]
    async fn invalid_input_never_reaches_transport(
        transport: ScriptedTransport,
        #[case] operation: &str,
        #[case] operands: serde_json::Value,
    ) {
        let dispatcher = Dispatcher::new(&transport);

        let result = dispatcher.dispatch(operation, &raw_operands(operands)).await;

        assert!(!result.is_success());
        assert!(transport.calls().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn concurrent_dispatches_do_not_interfere(transport: ScriptedTransport) {
        transport.respond_after(
            "/calculator",
            StatusCode::OK,
            "42",
            Duration::from_millis(40),
        );
        transport.respond("/create-people", StatusCode::CREATED, "created Ada");
        let dispatcher = Dispatcher::new(&transport);
        let sum_operands = raw_operands(json!({"number1": 40, "number2": 2}));
        let person_operands = raw_operands(json!({"name": "Ada", "age": 36}));

        let (sum, person) = tokio::join!(
            dispatcher.dispatch("sum", &sum_operands),
            dispatcher.dispatch("create-person", &person_operands),
        );

        assert_eq!(sum, OperationResult::success("42"));
        assert_eq!(person, OperationResult::success("created Ada"));
        assert_eq!(transport.calls().len(), 2);
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn text(&self) -> String {
            let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
            String::from_utf8_lossy(&bytes).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[rstest]
    #[tokio::test]
    async fn failures_are_logged_below_warn(transport: ScriptedTransport) {
        transport.respond("/calculator", StatusCode::INTERNAL_SERVER_ERROR, "boom");
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);
        let dispatcher = Dispatcher::new(&transport);

        let result = dispatcher
            .dispatch("sum", &raw_operands(json!({"number1": 1, "number2": 2})))
            .await;

        assert!(!result.is_success());
        let text = logs.text();
        assert!(text.contains("dispatch failed"), "{text}");
        assert!(!text.contains("WARN"), "{text}");
        assert!(!text.contains("ERROR"), "{text}");
    }
}
