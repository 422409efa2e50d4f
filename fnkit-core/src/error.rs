// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Custom error types for fnkit.
//!
//! All errors are explicit enum variants. Remote failures are kept in their
//! own type so commands can report them and carry on instead of aborting.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for fnkit.
#[derive(Debug, Error)]
pub enum FnkitError {
    // =========================================================================
    // Workspace Configuration
    // =========================================================================
    #[error("{} not found! Run `fnkit configure` to set up your function details.", .path.display())]
    NotConfigured { path: PathBuf },

    #[error("Configuration file {} is corrupt: {message}", .path.display())]
    ConfigCorrupt { path: PathBuf, message: String },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Function manifest {} is malformed: {message}", .path.display())]
    ManifestParse { path: PathBuf, message: String },

    // =========================================================================
    // Function Service
    // =========================================================================
    #[error("{0}")]
    Remote(#[from] RemoteError),

    #[error("HTTP client error: {message}")]
    HttpClient { message: String },

    // =========================================================================
    // Payloads and Local Invocation
    // =========================================================================
    #[error("Payload parse error: {message}")]
    PayloadParse { message: String },

    #[error("Local invocation failed: {message}")]
    LocalInvoke { message: String },

    #[error("Runtime '{runtime}' cannot be invoked locally")]
    UnsupportedRuntime { runtime: String },

    // =========================================================================
    // Scaffolding and Prompts
    // =========================================================================
    #[error("Project folder already exists: {}", .path.display())]
    ProjectExists { path: PathBuf },

    #[error("Scaffolding process aborted")]
    ScaffoldAborted,

    #[error("Prompt failed: {message}")]
    Prompt { message: String },

    // =========================================================================
    // System Errors
    // =========================================================================
    #[error("Archive error: {message}")]
    Archive { message: String },

    #[error("IO error: {context} - {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl FnkitError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }
}

/// Field validation errors raised while turning user input into a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("Invalid field value: {field} = {value} - {reason}")]
    InvalidFieldValue {
        field: &'static str,
        value: String,
        reason: String,
    },
}

/// Failure reported by the function service (or the transport in front of it).
///
/// Displays as the provider's message, verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RemoteError {
    /// Service operation that failed, e.g. `CreateFunction`.
    pub operation: &'static str,
    /// HTTP status, absent when the request never got a response.
    pub status: Option<u16>,
    /// Provider error code such as `ResourceNotFoundException`.
    pub code: Option<String>,
    pub message: String,
}

impl RemoteError {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            status: None,
            code: None,
            message: message.into(),
        }
    }

    /// Error for a request that failed before a response was received.
    pub fn transport(operation: &'static str, err: impl std::fmt::Display) -> Self {
        Self::new(operation, err.to_string())
    }
}

/// Result type alias using FnkitError.
pub type FnkitResult<T> = Result<T, FnkitError>;

/// Result of a single function service call.
pub type RemoteResult<T> = Result<T, RemoteError>;
