// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! User-facing output for command outcomes.

use std::fmt::Display;

use fnkit_core::{FunctionSummary, LogEvent, RemoteError};

pub fn success(message: impl Display) {
    println!("✓ SUCCESS - {}", message);
}

/// Report a function service failure. The provider's message is shown as is.
pub fn failure(err: &RemoteError) {
    eprintln!("✗ FAILED - {}", err);
    tracing::debug!(
        operation = err.operation,
        status = ?err.status,
        code = ?err.code,
        "Function service call failed"
    );
}

/// Print the service's full answer when running verbose.
pub fn details(summary: &FunctionSummary, verbose: bool) {
    if !verbose || summary.details.is_null() {
        return;
    }
    match serde_json::to_string_pretty(&summary.details) {
        Ok(pretty) => println!("{}", pretty),
        Err(_) => println!("{}", summary.details),
    }
}

pub fn log_event(event: &LogEvent) {
    let when = chrono::DateTime::from_timestamp_millis(event.timestamp)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S%.3f").to_string())
        .unwrap_or_else(|| event.timestamp.to_string());
    println!("{}  {}", when, event.message.trim_end());
}

