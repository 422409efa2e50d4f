// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! fnkit Core Library
//!
//! Workspace model and deployment lifecycle for serverless functions.
//! Provides the configuration store, source packaging, the remote function
//! service client, local handler execution, log tailing and project
//! scaffolding.

pub mod config;
pub mod deployer;
pub mod error;
pub mod manifest;
pub mod packager;
pub mod payload;
pub mod prompt;
pub mod runtime;
pub mod scaffold;
pub mod service;
pub mod tail;
pub mod types;
pub mod workspace;

// Re-export commonly used types
pub use config::{ConfigForm, ConfigStore, Configuration, FunctionOptions};
pub use deployer::{configure, Deployer, Invocation, UpdateReport};
pub use error::{FnkitError, FnkitResult, RemoteError, RemoteResult, ValidationError};
pub use packager::{Packager, ZipPackager};
pub use payload::ResponseBody;
pub use prompt::Prompter;
pub use runtime::{LocalInvocation, LocalRuntime, ProcessRuntime};
pub use scaffold::{new_project, ProjectForm, Scaffolder, UserDefaults};
pub use service::{FunctionService, FunctionSummary, InvokeResponse, LambdaClient, LogEvent, ServiceSettings};
pub use tail::{LogTail, POLL_INTERVAL};
pub use types::{FunctionName, Handler, MemorySize, Timeout};
pub use workspace::Workspace;
