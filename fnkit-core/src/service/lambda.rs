// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! HTTP client for the Lambda REST API and CloudWatch Logs.
//!
//! Requests are signed with SigV4 when credentials are configured and sent
//! unsigned otherwise, which is what local emulators expect.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::FunctionOptions;
use crate::error::{FnkitError, FnkitResult, RemoteError, RemoteResult};
use crate::service::sigv4::{self, Credentials, SigningRequest};
use crate::service::{FunctionService, FunctionSummary, InvokeResponse, LogEvent};
use crate::types::{FunctionName, Handler, MemorySize, Timeout};

const API_VERSION: &str = "2015-03-31";
const LOGS_TARGET: &str = "Logs_20140328.FilterLogEvents";
/// Upper bound on `nextToken` pages followed in a single log poll.
const MAX_LOG_PAGES: usize = 20;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Connection settings for the function service, read from the environment.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Overrides `https://lambda.<region>.amazonaws.com`.
    pub lambda_endpoint: Option<String>,
    /// Overrides `https://logs.<region>.amazonaws.com`.
    pub logs_endpoint: Option<String>,
    pub credentials: Option<Credentials>,
    pub request_timeout: Duration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            lambda_endpoint: None,
            logs_endpoint: None,
            credentials: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ServiceSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let endpoint = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let request_timeout = match lookup("FNKIT_HTTP_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    tracing::warn!(value = %raw, "Ignoring invalid FNKIT_HTTP_TIMEOUT_SECS");
                    DEFAULT_REQUEST_TIMEOUT
                }
            },
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        Self {
            lambda_endpoint: endpoint("FNKIT_LAMBDA_ENDPOINT"),
            logs_endpoint: endpoint("FNKIT_LOGS_ENDPOINT"),
            credentials: Credentials::from_lookup(&lookup),
            request_timeout,
        }
    }

    pub fn lambda_endpoint(&self, region: &str) -> String {
        match &self.lambda_endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://lambda.{}.amazonaws.com", region),
        }
    }

    pub fn logs_endpoint(&self, region: &str) -> String {
        match &self.logs_endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://logs.{}.amazonaws.com", region),
        }
    }
}

/// One HTTP exchange with the service.
struct Call<'a> {
    operation: &'static str,
    /// SigV4 service name.
    service: &'static str,
    region: &'a str,
    method: Method,
    url: String,
    headers: Vec<(&'static str, &'static str)>,
    body: Vec<u8>,
}

struct Reply {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct CreateFunctionRequest<'a> {
    #[serde(flatten)]
    options: &'a FunctionOptions,
    code: ZipCode,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ZipCode {
    zip_file: String,
}

impl ZipCode {
    fn new(archive: &[u8]) -> Self {
        Self {
            zip_file: base64::engine::general_purpose::STANDARD.encode(archive),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct UpdateConfigurationRequest<'a> {
    description: &'a str,
    role: &'a str,
    handler: &'a Handler,
    memory_size: MemorySize,
    timeout: Timeout,
    runtime: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FilterLogEventsOutput {
    #[serde(default)]
    events: Vec<FilteredLogEvent>,
    next_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FilteredLogEvent {
    timestamp: i64,
    #[serde(default)]
    message: String,
    log_stream_name: Option<String>,
}

/// `FunctionService` implementation over the Lambda REST API.
#[derive(Debug, Clone)]
pub struct LambdaClient {
    http: Client,
    settings: ServiceSettings,
}

impl LambdaClient {
    pub fn new(settings: ServiceSettings) -> FnkitResult<Self> {
        let http = Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| FnkitError::HttpClient {
                message: e.to_string(),
            })?;

        tracing::debug!(
            signed = settings.credentials.is_some(),
            timeout_secs = settings.request_timeout.as_secs(),
            "Function service client ready"
        );

        Ok(Self { http, settings })
    }

    fn function_url(&self, region: &str, suffix: &str) -> String {
        format!(
            "{}/{}/functions{}",
            self.settings.lambda_endpoint(region),
            API_VERSION,
            suffix
        )
    }

    async fn send(&self, call: Call<'_>) -> RemoteResult<Reply> {
        let operation = call.operation;
        let url = Url::parse(&call.url).map_err(|e| RemoteError::transport(operation, e))?;

        let mut request = self.http.request(call.method.clone(), url.clone());
        for (name, value) in &call.headers {
            request = request.header(*name, *value);
        }

        if let Some(credentials) = &self.settings.credentials {
            let host = match (url.host_str(), url.port()) {
                (Some(host), Some(port)) => format!("{}:{}", host, port),
                (Some(host), None) => host.to_string(),
                (None, _) => String::new(),
            };
            let signing = SigningRequest {
                method: call.method.as_str(),
                host: &host,
                path: url.path(),
                query: url.query().unwrap_or(""),
                payload: &call.body,
                region: call.region,
                service: call.service,
            };
            for (name, value) in sigv4::sign(credentials, &signing, chrono::Utc::now()) {
                request = request.header(name, value);
            }
        }

        tracing::debug!(operation, method = %call.method, url = %url, "Calling function service");

        let response = request
            .body(call.body)
            .send()
            .await
            .map_err(|e| RemoteError::transport(operation, e))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| RemoteError::transport(operation, e))?
            .to_vec();

        tracing::debug!(operation, status = status.as_u16(), bytes = body.len(), "Function service replied");

        if !status.is_success() {
            return Err(remote_error(operation, status, &headers, &body));
        }

        Ok(Reply {
            status,
            headers,
            body,
        })
    }
}

fn encode(operation: &'static str, value: &impl Serialize) -> RemoteResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| RemoteError::new(operation, format!("invalid request: {}", e)))
}

fn summary(operation: &'static str, fallback: &FunctionName, reply: &Reply) -> RemoteResult<FunctionSummary> {
    let details: Value = if reply.body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&reply.body)
            .map_err(|e| RemoteError::new(operation, format!("invalid response: {}", e)))?
    };

    let function_name = details
        .get("FunctionName")
        .and_then(Value::as_str)
        .unwrap_or(fallback.as_str())
        .to_string();

    Ok(FunctionSummary {
        function_name,
        details,
    })
}

/// Build a `RemoteError` from a non-2xx response.
///
/// The code comes from `x-amzn-ErrorType` or the body's `__type`/`Type`;
/// the message from the body's `message`/`Message`, else the raw body.
fn remote_error(
    operation: &'static str,
    status: StatusCode,
    headers: &HeaderMap,
    body: &[u8],
) -> RemoteError {
    let document: Option<Value> = serde_json::from_slice(body).ok();
    let field = |names: &[&str]| -> Option<String> {
        let doc = document.as_ref()?;
        names
            .iter()
            .find_map(|name| doc.get(*name).and_then(Value::as_str))
            .map(str::to_string)
    };

    let code = headers
        .get("x-amzn-errortype")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(':').next().unwrap_or(v).to_string())
        .or_else(|| field(&["__type", "Type"]))
        .map(|code| code.rsplit('#').next().unwrap_or(&code).to_string());

    let text = String::from_utf8_lossy(body).trim().to_string();
    let message = field(&["message", "Message"])
        .or_else(|| (!text.is_empty()).then_some(text))
        .unwrap_or_else(|| format!("{} failed with HTTP {}", operation, status));

    RemoteError {
        operation,
        status: Some(status.as_u16()),
        code,
        message,
    }
}

#[async_trait]
impl FunctionService for LambdaClient {
    async fn create(
        &self,
        region: &str,
        options: &FunctionOptions,
        archive: &[u8],
    ) -> RemoteResult<FunctionSummary> {
        const OP: &str = "CreateFunction";
        let body = encode(
            OP,
            &CreateFunctionRequest {
                options,
                code: ZipCode::new(archive),
            },
        )?;

        let reply = self
            .send(Call {
                operation: OP,
                service: "lambda",
                region,
                method: Method::POST,
                url: self.function_url(region, ""),
                headers: vec![("content-type", "application/json")],
                body,
            })
            .await?;

        summary(OP, &options.function_name, &reply)
    }

    async fn update_code(
        &self,
        region: &str,
        name: &FunctionName,
        archive: &[u8],
    ) -> RemoteResult<FunctionSummary> {
        const OP: &str = "UpdateFunctionCode";
        let body = encode(OP, &ZipCode::new(archive))?;

        let reply = self
            .send(Call {
                operation: OP,
                service: "lambda",
                region,
                method: Method::PUT,
                url: self.function_url(region, &format!("/{}/code", name)),
                headers: vec![("content-type", "application/json")],
                body,
            })
            .await?;

        summary(OP, name, &reply)
    }

    async fn update_configuration(
        &self,
        region: &str,
        options: &FunctionOptions,
    ) -> RemoteResult<FunctionSummary> {
        const OP: &str = "UpdateFunctionConfiguration";
        let body = encode(
            OP,
            &UpdateConfigurationRequest {
                description: &options.description,
                role: &options.role,
                handler: &options.handler,
                memory_size: options.memory_size,
                timeout: options.timeout,
                runtime: &options.runtime,
            },
        )?;

        let reply = self
            .send(Call {
                operation: OP,
                service: "lambda",
                region,
                method: Method::PUT,
                url: self.function_url(
                    region,
                    &format!("/{}/configuration", options.function_name),
                ),
                headers: vec![("content-type", "application/json")],
                body,
            })
            .await?;

        summary(OP, &options.function_name, &reply)
    }

    async fn delete(&self, region: &str, name: &FunctionName) -> RemoteResult<()> {
        self.send(Call {
            operation: "DeleteFunction",
            service: "lambda",
            region,
            method: Method::DELETE,
            url: self.function_url(region, &format!("/{}", name)),
            headers: Vec::new(),
            body: Vec::new(),
        })
        .await?;
        Ok(())
    }

    async fn invoke(
        &self,
        region: &str,
        name: &FunctionName,
        payload: Option<&Value>,
    ) -> RemoteResult<InvokeResponse> {
        const OP: &str = "Invoke";
        let body = match payload {
            Some(payload) => encode(OP, payload)?,
            None => Vec::new(),
        };

        let reply = self
            .send(Call {
                operation: OP,
                service: "lambda",
                region,
                method: Method::POST,
                url: self.function_url(region, &format!("/{}/invocations", name)),
                headers: vec![
                    ("content-type", "application/json"),
                    ("x-amz-invocation-type", "RequestResponse"),
                    ("x-amz-log-type", "None"),
                ],
                body,
            })
            .await?;

        let function_error = reply
            .headers
            .get("x-amz-function-error")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(InvokeResponse {
            status: reply.status.as_u16(),
            function_error,
            payload: reply.body,
        })
    }

    async fn tail_logs(
        &self,
        region: &str,
        name: &FunctionName,
        since_ms: i64,
    ) -> RemoteResult<Vec<LogEvent>> {
        const OP: &str = "FilterLogEvents";
        let mut events = Vec::new();
        let mut next_token: Option<String> = None;

        for _ in 0..MAX_LOG_PAGES {
            let mut request = json!({
                "logGroupName": name.log_group(),
                "startTime": since_ms,
                "interleaved": true,
            });
            if let Some(token) = &next_token {
                request["nextToken"] = Value::String(token.clone());
            }

            let reply = self
                .send(Call {
                    operation: OP,
                    service: "logs",
                    region,
                    method: Method::POST,
                    url: format!("{}/", self.settings.logs_endpoint(region)),
                    headers: vec![
                        ("content-type", "application/x-amz-json-1.1"),
                        ("x-amz-target", LOGS_TARGET),
                    ],
                    body: encode(OP, &request)?,
                })
                .await?;

            let page: FilterLogEventsOutput = serde_json::from_slice(&reply.body)
                .map_err(|e| RemoteError::new(OP, format!("invalid response: {}", e)))?;

            events.extend(page.events.into_iter().map(|e| LogEvent {
                timestamp: e.timestamp,
                message: e.message,
                stream: e.log_stream_name,
            }));

            match page.next_token {
                Some(token) if next_token.as_deref() != Some(token.as_str()) => {
                    next_token = Some(token)
                }
                _ => break,
            }
        }

        Ok(events)
    }
}
