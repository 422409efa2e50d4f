// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Newtype wrappers for validated configuration fields.
//!
//! Each type checks its invariant at construction, so a `Configuration`
//! holding them is valid by construction.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Largest memory size the function service accepts, in MB.
const MAX_MEMORY_MB: u32 = 10_240;
/// Longest execution timeout the function service accepts: 15 minutes.
const MAX_TIMEOUT_SECS: u32 = 900;

/// Validated remote function name.
/// Must be non-empty, alphanumeric with hyphens/underscores, max 64 chars.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FunctionName(String);

impl FunctionName {
    /// Create a new FunctionName with validation.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();

        if name.is_empty() {
            return Err(ValidationError::MissingRequiredField {
                field: "FunctionName",
            });
        }

        if name.len() > 64 {
            return Err(ValidationError::InvalidFieldValue {
                field: "FunctionName",
                value: name.clone(),
                reason: format!("Function name too long: {} chars (max 64)", name.len()),
            });
        }

        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ValidationError::InvalidFieldValue {
                field: "FunctionName",
                value: name,
                reason: "Function name must contain only letters, digits, hyphens, and underscores"
                    .to_string(),
            });
        }

        Ok(Self(name))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Log group the function service writes this function's output to.
    pub fn log_group(&self) -> String {
        format!("/aws/lambda/{}", self.0)
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for FunctionName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FunctionName> for String {
    fn from(name: FunctionName) -> Self {
        name.0
    }
}

/// Handler reference as the function service understands it.
///
/// Only required to be non-empty: its shape depends on the runtime
/// (`index.handler` for Node, `bootstrap` for custom runtimes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Handler(String);

impl Handler {
    pub fn new(handler: impl Into<String>) -> Result<Self, ValidationError> {
        let handler = handler.into();
        if handler.trim().is_empty() {
            return Err(ValidationError::MissingRequiredField { field: "Handler" });
        }
        Ok(Self(handler))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split `module.export` at the last dot, e.g. `("lib/app", "run")` for
    /// `lib/app.run`. `None` when either side would be empty.
    pub fn module_export(&self) -> Option<(&str, &str)> {
        self.0
            .rsplit_once('.')
            .filter(|(module, export)| !module.is_empty() && !export.is_empty())
    }
}

impl fmt::Display for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Handler {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Handler> for String {
    fn from(handler: Handler) -> Self {
        handler.0
    }
}

/// Validated memory size in megabytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct MemorySize(u32);

impl MemorySize {
    /// Create a new MemorySize with bounds validation.
    pub fn new(mb: u32) -> Result<Self, ValidationError> {
        if mb == 0 || mb > MAX_MEMORY_MB {
            return Err(ValidationError::InvalidFieldValue {
                field: "MemorySize",
                value: mb.to_string(),
                reason: format!("Must be between 1 and {} MB", MAX_MEMORY_MB),
            });
        }
        Ok(Self(mb))
    }

    /// Get the memory size in megabytes.
    pub fn megabytes(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for MemorySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}MB", self.0)
    }
}

impl TryFrom<u32> for MemorySize {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MemorySize> for u32 {
    fn from(size: MemorySize) -> Self {
        size.0
    }
}

/// Validated execution timeout in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Timeout(u32);

impl Timeout {
    pub fn new(secs: u32) -> Result<Self, ValidationError> {
        if secs == 0 {
            return Err(ValidationError::InvalidFieldValue {
                field: "Timeout",
                value: "0".to_string(),
                reason: "Timeout must be greater than 0".to_string(),
            });
        }

        if secs > MAX_TIMEOUT_SECS {
            return Err(ValidationError::InvalidFieldValue {
                field: "Timeout",
                value: secs.to_string(),
                reason: format!(
                    "Timeout must not exceed 15 minutes ({}s)",
                    MAX_TIMEOUT_SECS
                ),
            });
        }

        Ok(Self(secs))
    }

    pub fn seconds(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

impl TryFrom<u32> for Timeout {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Timeout> for u32 {
    fn from(timeout: Timeout) -> Self {
        timeout.0
    }
}
