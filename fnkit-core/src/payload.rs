// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Invocation payloads and response display.
//!
//! Both directions are lenient: a missing or broken payload file means
//! "no payload", and a response that is not JSON is shown as raw text.

use std::fmt;
use std::path::Path;

use serde_json::Value;

use crate::error::{FnkitError, FnkitResult};

/// Load the optional payload file.
///
/// Absence is silent. An unreadable or unparseable file is logged and
/// treated as absent.
pub fn load_payload(path: &Path) -> Option<Value> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No payload file, invoking without payload");
            return None;
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Payload file unreadable, invoking without payload");
            return None;
        }
    };

    match parse_payload(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring payload file");
            None
        }
    }
}

fn parse_payload(content: &str) -> FnkitResult<Value> {
    serde_json::from_str(content).map_err(|e| FnkitError::PayloadParse {
        message: e.to_string(),
    })
}

/// Response payload prepared for display.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Empty,
    Json(Value),
    Raw(String),
}

impl ResponseBody {
    /// Parse a response payload, falling back to raw text when it is not JSON.
    pub fn parse(bytes: &[u8]) -> Self {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Self::Empty;
        }

        match serde_json::from_slice(bytes) {
            Ok(value) => Self::Json(value),
            Err(e) => {
                tracing::debug!(error = %e, "Response payload is not JSON, showing raw text");
                Self::Raw(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }
}

impl fmt::Display for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "(empty response)"),
            Self::Json(value) => match serde_json::to_string_pretty(value) {
                Ok(pretty) => write!(f, "{}", pretty),
                Err(_) => write!(f, "{}", value),
            },
            Self::Raw(text) => write!(f, "{}", text),
        }
    }
}
