//! End-to-end dispatch over the hyper transport against a local axum server.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::routing::post;
use opcall_dispatch::{
    Dispatcher, EndpointDescriptor, ErrorKind, HttpTransport, OperationRegistry,
    OperationResult, OperationSpec, RawOperands,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

#[derive(Debug, Clone)]
struct Received {
    path: String,
    content_type: Option<String>,
    body: Value,
}

type Log = Arc<Mutex<Vec<Received>>>;

struct TestServer {
    address: SocketAddr,
    log: Log,
    handle: JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0))
            .await
            .context("bind test server")?;
        let address = listener.local_addr().context("local addr")?;
        let log: Log = Arc::default();
        let app = Router::new()
            .route("/calculator", post(calculator))
            .route("/create-people", post(create_people))
            .route("/explode", post(explode))
            .with_state(Arc::clone(&log));
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Ok(Self {
            address,
            log,
            handle,
        })
    }

    fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}/", self.address)).expect("server url")
    }

    fn received(&self) -> Vec<Received> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn record(log: &Log, uri: &Uri, headers: &HeaderMap, body: &Bytes) -> Value {
    let parsed: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
    log.lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(Received {
            path: uri.path().to_owned(),
            content_type: headers
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned),
            body: parsed.clone(),
        });
    parsed
}

async fn calculator(
    State(log): State<Log>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let request = record(&log, &uri, &headers, &body);
    let first = request["number1"].as_f64().unwrap_or_default();
    let second = request["number2"].as_f64().unwrap_or_default();
    let outcome = match request["operation"].as_str() {
        Some("sum") => first + second,
        Some("sub") => first - second,
        Some("mult") => first * second,
        Some("div") if second != 0.0 => first / second,
        _ => return (StatusCode::BAD_REQUEST, String::from("bad calculation")),
    };
    (StatusCode::OK, outcome.to_string())
}

async fn create_people(
    State(log): State<Log>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let request = record(&log, &uri, &headers, &body);
    let name = request["name"].as_str().unwrap_or_default().to_owned();
    (StatusCode::CREATED, format!("created {name}"))
}

async fn explode(
    State(log): State<Log>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    record(&log, &uri, &headers, &body);
    StatusCode::INTERNAL_SERVER_ERROR
}

fn operands(value: Value) -> RawOperands {
    match value {
        Value::Object(map) => map,
        other => panic!("operands must be an object, got {other}"),
    }
}

#[tokio::test]
async fn posts_json_and_returns_plain_text() -> Result<()> {
    let server = TestServer::spawn().await?;
    let dispatcher = Dispatcher::new(HttpTransport::new(server.base_url()));

    let result = dispatcher
        .dispatch("sum", &operands(json!({"number1": "40", "number2": "2"})))
        .await;

    assert_eq!(result, OperationResult::success("42"));
    let received = server.received();
    assert_eq!(received.len(), 1);
    let call = received.first().context("recorded call")?;
    assert_eq!(call.path, "/calculator");
    assert_eq!(call.content_type.as_deref(), Some("application/json"));
    assert_eq!(
        call.body,
        json!({"operation": "sum", "number1": 40, "number2": 2})
    );
    Ok(())
}

#[tokio::test]
async fn non_success_statuses_become_failures() -> Result<()> {
    let server = TestServer::spawn().await?;
    let dispatcher = Dispatcher::new(HttpTransport::new(server.base_url()));

    let error = dispatcher
        .try_dispatch("div", &operands(json!({"number1": 1, "number2": 0})))
        .await
        .expect_err("division by zero is refused");

    assert_eq!(error.kind(), ErrorKind::Server);
    assert!(error.to_string().contains("400"), "{error}");
    Ok(())
}

#[tokio::test]
async fn created_status_counts_as_success() -> Result<()> {
    let server = TestServer::spawn().await?;
    let dispatcher = Dispatcher::new(HttpTransport::new(server.base_url()));

    let result = dispatcher
        .dispatch(
            "create-person",
            &operands(json!({"name": "Ada", "age": "36"})),
        )
        .await;

    assert_eq!(result, OperationResult::success("created Ada"));
    let received = server.received();
    let call = received.first().context("recorded call")?;
    assert_eq!(call.path, "/create-people");
    assert_eq!(call.body, json!({"name": "Ada", "age": 36}));
    Ok(())
}

#[tokio::test]
async fn custom_registry_reports_internal_server_errors() -> Result<()> {
    let server = TestServer::spawn().await?;
    let registry = OperationRegistry::builder()
        .operation(OperationSpec {
            key: "explode",
            operands: &[],
            endpoint: EndpointDescriptor::post("/explode"),
        })
        .build();
    let dispatcher =
        Dispatcher::with_registry(&registry, HttpTransport::new(server.base_url()));

    let result = dispatcher.dispatch("explode", &RawOperands::new()).await;

    assert_eq!(
        result,
        OperationResult::failure("server responded with status 500 Internal Server Error")
    );
    assert_eq!(server.received().len(), 1);
    Ok(())
}

#[tokio::test]
async fn refused_connections_are_transport_failures() -> Result<()> {
    let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
    let address = listener.local_addr()?;
    drop(listener);
    let base = Url::parse(&format!("http://{address}/"))?;
    let dispatcher = Dispatcher::new(HttpTransport::new(base));

    let error = dispatcher
        .try_dispatch("mult", &operands(json!({"number1": 2, "number2": 3})))
        .await
        .expect_err("nothing is listening");

    assert_eq!(error.kind(), ErrorKind::Transport);
    assert!(error.to_string().starts_with("transport failure: request failed"));
    Ok(())
}
