// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! HTTP adapter tests for fnkit.
//!
//! `LambdaClient` is pointed at a local axum server that records every
//! request and answers with canned responses.

use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use base64::Engine;
use fnkit_core::service::Credentials;
use fnkit_core::{
    ConfigForm, FunctionName, FunctionOptions, FunctionService, LambdaClient, ServiceSettings,
};
use serde_json::{json, Value};

// =============================================================================
// Stub server
// =============================================================================

#[derive(Debug, Clone)]
struct Recorded {
    method: Method,
    path: String,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Recorded {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body is not JSON")
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

type Responder = fn(&Recorded, usize) -> Response;

#[derive(Clone)]
struct StubState {
    recorded: Arc<Mutex<Vec<Recorded>>>,
    responder: Responder,
}

async fn record(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = Recorded {
        method,
        path: uri.path().to_string(),
        headers,
        body: body.to_vec(),
    };
    let index = {
        let mut recorded = state.recorded.lock().unwrap();
        recorded.push(request.clone());
        recorded.len() - 1
    };
    (state.responder)(&request, index)
}

async fn spawn_stub(responder: Responder) -> (String, Arc<Mutex<Vec<Recorded>>>) {
    let recorded = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new().fallback(record).with_state(StubState {
        recorded: recorded.clone(),
        responder,
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub server");
    let addr = listener.local_addr().expect("Failed to read stub address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server failed");
    });

    (format!("http://{}", addr), recorded)
}

fn client(endpoint: &str, credentials: Option<Credentials>) -> LambdaClient {
    LambdaClient::new(ServiceSettings {
        lambda_endpoint: Some(endpoint.to_string()),
        logs_endpoint: Some(endpoint.to_string()),
        credentials,
        ..Default::default()
    })
    .expect("Failed to build client")
}

fn options() -> FunctionOptions {
    ConfigForm {
        function_name: "fn1".to_string(),
        description: "greets".to_string(),
        role: "arn:aws:iam::123456789012:role/lambda-exec".to_string(),
        memory_size: "256".to_string(),
        timeout: "10".to_string(),
        ..Default::default()
    }
    .validate()
    .expect("valid form")
    .function
}

fn name() -> FunctionName {
    FunctionName::new("fn1").unwrap()
}

fn function_document(_: &Recorded, _: usize) -> Response {
    (
        StatusCode::OK,
        axum::Json(json!({
            "FunctionName": "fn1",
            "FunctionArn": "arn:aws:lambda:eu-west-1:123456789012:function:fn1",
            "Runtime": "nodejs18.x"
        })),
    )
        .into_response()
}

// =============================================================================
// Function operations
// =============================================================================

#[tokio::test]
async fn test_create_request_shape() {
    let (endpoint, recorded) = spawn_stub(function_document).await;
    let archive = b"PK\x03\x04archive-bytes".to_vec();

    let summary = client(&endpoint, None)
        .create("eu-west-1", &options(), &archive)
        .await
        .expect("create failed");
    assert_eq!(summary.function_name, "fn1");
    assert_eq!(
        summary.details["FunctionArn"],
        "arn:aws:lambda:eu-west-1:123456789012:function:fn1"
    );

    let requests = recorded.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, "/2015-03-31/functions");
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert!(request.header("authorization").is_none());

    let body = request.json();
    assert_eq!(body["FunctionName"], "fn1");
    assert_eq!(body["Description"], "greets");
    assert_eq!(body["Role"], "arn:aws:iam::123456789012:role/lambda-exec");
    assert_eq!(body["Handler"], "index.handler");
    assert_eq!(body["MemorySize"], 256);
    assert_eq!(body["Timeout"], 10);
    assert_eq!(body["Runtime"], "nodejs18.x");
    let zip = base64::engine::general_purpose::STANDARD
        .decode(body["Code"]["ZipFile"].as_str().expect("ZipFile missing"))
        .expect("ZipFile is not base64");
    assert_eq!(zip, archive);
}

#[tokio::test]
async fn test_update_code_request_shape() {
    let (endpoint, recorded) = spawn_stub(function_document).await;

    client(&endpoint, None)
        .update_code("eu-west-1", &name(), b"zip")
        .await
        .expect("update_code failed");

    let request = recorded.lock().unwrap()[0].clone();
    assert_eq!(request.method, Method::PUT);
    assert_eq!(request.path, "/2015-03-31/functions/fn1/code");
    assert_eq!(request.json(), json!({ "ZipFile": "emlw" }));
}

#[tokio::test]
async fn test_update_configuration_request_shape() {
    let (endpoint, recorded) = spawn_stub(function_document).await;

    client(&endpoint, None)
        .update_configuration("eu-west-1", &options())
        .await
        .expect("update_configuration failed");

    let request = recorded.lock().unwrap()[0].clone();
    assert_eq!(request.method, Method::PUT);
    assert_eq!(request.path, "/2015-03-31/functions/fn1/configuration");

    let body = request.json();
    assert!(body.get("FunctionName").is_none());
    assert!(body.get("Code").is_none());
    assert_eq!(body["MemorySize"], 256);
    assert_eq!(body["Runtime"], "nodejs18.x");
}

#[tokio::test]
async fn test_delete_maps_service_error() {
    fn not_found(_: &Recorded, _: usize) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-amzn-errortype",
            HeaderValue::from_static("ResourceNotFoundException"),
        );
        (
            StatusCode::NOT_FOUND,
            headers,
            axum::Json(json!({
                "Type": "User",
                "Message": "Function not found: arn:aws:lambda:eu-west-1:123456789012:function:fn1"
            })),
        )
            .into_response()
    }

    let (endpoint, recorded) = spawn_stub(not_found).await;

    let err = client(&endpoint, None)
        .delete("eu-west-1", &name())
        .await
        .expect_err("delete should fail");

    assert_eq!(err.operation, "DeleteFunction");
    assert_eq!(err.status, Some(404));
    assert_eq!(err.code.as_deref(), Some("ResourceNotFoundException"));
    assert_eq!(
        err.to_string(),
        "Function not found: arn:aws:lambda:eu-west-1:123456789012:function:fn1"
    );

    let request = recorded.lock().unwrap()[0].clone();
    assert_eq!(request.method, Method::DELETE);
    assert_eq!(request.path, "/2015-03-31/functions/fn1");
}

#[tokio::test]
async fn test_invoke_request_and_function_error() {
    fn crashed(_: &Recorded, _: usize) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert("x-amz-function-error", HeaderValue::from_static("Unhandled"));
        (
            StatusCode::OK,
            headers,
            r#"{"errorMessage":"boom","errorType":"Error"}"#,
        )
            .into_response()
    }

    let (endpoint, recorded) = spawn_stub(crashed).await;
    let payload = json!({ "key1": "value1" });

    let response = client(&endpoint, None)
        .invoke("eu-west-1", &name(), Some(&payload))
        .await
        .expect("invoke failed");

    assert_eq!(response.status, 200);
    assert_eq!(response.function_error.as_deref(), Some("Unhandled"));
    let body: Value = serde_json::from_slice(&response.payload).unwrap();
    assert_eq!(body["errorMessage"], "boom");

    let request = recorded.lock().unwrap()[0].clone();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, "/2015-03-31/functions/fn1/invocations");
    assert_eq!(request.header("x-amz-invocation-type"), Some("RequestResponse"));
    assert_eq!(request.header("x-amz-log-type"), Some("None"));
    assert_eq!(request.json(), payload);
}

#[tokio::test]
async fn test_invoke_without_payload_sends_empty_body() {
    fn plain(_: &Recorded, _: usize) -> Response {
        (StatusCode::OK, "Hello from Lambda!").into_response()
    }

    let (endpoint, recorded) = spawn_stub(plain).await;

    let response = client(&endpoint, None)
        .invoke("eu-west-1", &name(), None)
        .await
        .expect("invoke failed");

    assert_eq!(response.function_error, None);
    assert_eq!(response.payload, b"Hello from Lambda!");
    assert!(recorded.lock().unwrap()[0].body.is_empty());
}

// =============================================================================
// Logs
// =============================================================================

#[tokio::test]
async fn test_tail_logs_follows_pages() {
    fn pages(_: &Recorded, index: usize) -> Response {
        let page = if index == 0 {
            json!({
                "events": [
                    {"timestamp": 1000, "message": "START", "logStreamName": "s1", "eventId": "1"}
                ],
                "nextToken": "page-2"
            })
        } else {
            json!({
                "events": [
                    {"timestamp": 1005, "message": "END", "logStreamName": "s1", "eventId": "2"}
                ],
                "searchedLogStreams": []
            })
        };
        (StatusCode::OK, axum::Json(page)).into_response()
    }

    let (endpoint, recorded) = spawn_stub(pages).await;

    let events = client(&endpoint, None)
        .tail_logs("eu-west-1", &name(), 900)
        .await
        .expect("tail_logs failed");

    let messages: Vec<&str> = events.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages, ["START", "END"]);
    assert_eq!(events[0].stream.as_deref(), Some("s1"));

    let requests = recorded.lock().unwrap();
    assert_eq!(requests.len(), 2);
    let first = &requests[0];
    assert_eq!(first.method, Method::POST);
    assert_eq!(first.path, "/");
    assert_eq!(
        first.header("x-amz-target"),
        Some("Logs_20140328.FilterLogEvents")
    );
    assert_eq!(
        first.header("content-type"),
        Some("application/x-amz-json-1.1")
    );
    assert_eq!(
        first.json(),
        json!({ "logGroupName": "/aws/lambda/fn1", "startTime": 900, "interleaved": true })
    );
    assert_eq!(requests[1].json()["nextToken"], "page-2");
}

#[tokio::test]
async fn test_tail_logs_missing_group_is_remote_error() {
    fn missing(_: &Recorded, _: usize) -> Response {
        (
            StatusCode::BAD_REQUEST,
            axum::Json(json!({
                "__type": "ResourceNotFoundException",
                "message": "The specified log group does not exist."
            })),
        )
            .into_response()
    }

    let (endpoint, _recorded) = spawn_stub(missing).await;

    let err = client(&endpoint, None)
        .tail_logs("eu-west-1", &name(), 0)
        .await
        .expect_err("tail_logs should fail");
    assert_eq!(err.code.as_deref(), Some("ResourceNotFoundException"));
    assert_eq!(err.to_string(), "The specified log group does not exist.");
}

// =============================================================================
// Signing and transport
// =============================================================================

#[tokio::test]
async fn test_requests_are_signed_with_credentials() {
    let (endpoint, recorded) = spawn_stub(function_document).await;
    let credentials = Credentials {
        access_key_id: "AKIDEXAMPLE".to_string(),
        secret_access_key: "s3cr3t-value".to_string(),
        session_token: Some("session-token".to_string()),
    };

    client(&endpoint, Some(credentials))
        .update_configuration("eu-west-1", &options())
        .await
        .expect("update_configuration failed");

    let request = recorded.lock().unwrap()[0].clone();
    let authorization = request.header("authorization").expect("not signed");
    assert!(authorization.starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/"));
    assert!(authorization.contains("/eu-west-1/lambda/aws4_request"));
    assert!(authorization.contains("SignedHeaders=host;x-amz-date;x-amz-security-token"));
    assert!(request.header("x-amz-date").is_some());
    assert_eq!(request.header("x-amz-security-token"), Some("session-token"));
}

#[tokio::test]
async fn test_connection_failure_is_remote_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{}", addr), None)
        .delete("eu-west-1", &name())
        .await
        .expect_err("nothing is listening");

    assert_eq!(err.operation, "DeleteFunction");
    assert_eq!(err.status, None);
}
