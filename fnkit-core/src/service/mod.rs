// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Remote function service boundary.
//!
//! The `FunctionService` trait is the fixed operation set the deployer
//! drives; `LambdaClient` implements it over HTTP.

use async_trait::async_trait;
use serde_json::Value;

use crate::config::FunctionOptions;
use crate::error::RemoteResult;
use crate::types::FunctionName;

pub mod lambda;
pub mod sigv4;

pub use lambda::{LambdaClient, ServiceSettings};
pub use sigv4::Credentials;

/// Function description returned by create/update calls.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSummary {
    pub function_name: String,
    /// Full response document, for verbose display.
    pub details: Value,
}

/// Result of a synchronous invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeResponse {
    pub status: u16,
    /// Set when the function itself failed (`Handled` / `Unhandled`).
    pub function_error: Option<String>,
    pub payload: Vec<u8>,
}

/// One log line produced by the function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub message: String,
    pub stream: Option<String>,
}

/// Operations offered by the remote function service.
///
/// Every call is a single request: no retries, no backoff.
#[async_trait]
pub trait FunctionService: Send + Sync {
    async fn create(
        &self,
        region: &str,
        options: &FunctionOptions,
        archive: &[u8],
    ) -> RemoteResult<FunctionSummary>;

    async fn update_code(
        &self,
        region: &str,
        name: &FunctionName,
        archive: &[u8],
    ) -> RemoteResult<FunctionSummary>;

    async fn update_configuration(
        &self,
        region: &str,
        options: &FunctionOptions,
    ) -> RemoteResult<FunctionSummary>;

    async fn delete(&self, region: &str, name: &FunctionName) -> RemoteResult<()>;

    async fn invoke(
        &self,
        region: &str,
        name: &FunctionName,
        payload: Option<&Value>,
    ) -> RemoteResult<InvokeResponse>;

    /// Log events for the function with a timestamp at or after `since_ms`.
    async fn tail_logs(
        &self,
        region: &str,
        name: &FunctionName,
        since_ms: i64,
    ) -> RemoteResult<Vec<LogEvent>>;
}
