// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Function configuration: the typed record, the prompt form it is built
//! from, and the JSON store that persists it in the workspace.
//!
//! Input always goes through a raw stage (`ConfigForm` for prompts,
//! `StoredConfig` for the file) and is validated into a `Configuration`.
//! A record that exists but does not validate is corrupt, never "absent".

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FnkitError, FnkitResult, ValidationError};
use crate::types::{FunctionName, Handler, MemorySize, Timeout};
use crate::workspace::Workspace;

const DEFAULT_FUNCTION_NAME: &str = "my-lambda";
const DEFAULT_REGION: &str = "eu-west-1";
const DEFAULT_HANDLER: &str = "index.handler";
const DEFAULT_MEMORY_MB: u32 = 128;
const DEFAULT_TIMEOUT_SECS: u32 = 3;
const DEFAULT_RUNTIME: &str = "nodejs18.x";

/// Options describing the remote function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionOptions {
    pub function_name: FunctionName,
    pub description: String,
    pub role: String,
    pub handler: Handler,
    pub memory_size: MemorySize,
    pub timeout: Timeout,
    pub runtime: String,
}

/// Validated configuration record for one workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredConfig")]
#[serde(rename_all = "PascalCase")]
pub struct Configuration {
    pub region: String,
    #[serde(rename = "ConfigOptions")]
    pub function: FunctionOptions,
}

/// Raw record as found on disk (before validation).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StoredConfig {
    region: String,
    config_options: StoredOptions,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StoredOptions {
    function_name: String,
    #[serde(default)]
    description: Option<String>,
    role: String,
    handler: String,
    memory_size: StoredNumber,
    timeout: StoredNumber,
    runtime: String,
}

/// Older records store numbers as strings (`"MemorySize": "128"`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredNumber {
    Number(u32),
    Text(String),
}

impl StoredNumber {
    fn value(self, field: &'static str) -> Result<u32, ValidationError> {
        match self {
            Self::Number(n) => Ok(n),
            Self::Text(text) => positive_integer(field, &text),
        }
    }
}

impl TryFrom<StoredConfig> for Configuration {
    type Error = ValidationError;

    fn try_from(raw: StoredConfig) -> Result<Self, Self::Error> {
        let options = raw.config_options;
        Ok(Self {
            region: required("Region", raw.region)?,
            function: FunctionOptions {
                function_name: FunctionName::new(options.function_name)?,
                description: options.description.unwrap_or_default(),
                role: required("Role", options.role)?,
                handler: Handler::new(options.handler)?,
                memory_size: MemorySize::new(options.memory_size.value("MemorySize")?)?,
                timeout: Timeout::new(options.timeout.value("Timeout")?)?,
                runtime: required("Runtime", options.runtime)?,
            },
        })
    }
}

fn required(field: &'static str, value: String) -> Result<String, ValidationError> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(ValidationError::MissingRequiredField { field });
    }
    Ok(value)
}

fn positive_integer(field: &'static str, value: &str) -> Result<u32, ValidationError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| ValidationError::InvalidFieldValue {
            field,
            value: value.to_string(),
            reason: "Must be a positive integer".to_string(),
        })
}

/// Answers collected by the `configure` prompts, as typed by the user.
///
/// `Default` yields the hardcoded defaults used when no record exists yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigForm {
    pub function_name: String,
    pub region: String,
    pub description: String,
    pub role: String,
    pub handler: String,
    pub memory_size: String,
    pub timeout: String,
    pub runtime: String,
}

impl Default for ConfigForm {
    fn default() -> Self {
        Self {
            function_name: DEFAULT_FUNCTION_NAME.to_string(),
            region: DEFAULT_REGION.to_string(),
            description: String::new(),
            role: String::new(),
            handler: DEFAULT_HANDLER.to_string(),
            memory_size: DEFAULT_MEMORY_MB.to_string(),
            timeout: DEFAULT_TIMEOUT_SECS.to_string(),
            runtime: DEFAULT_RUNTIME.to_string(),
        }
    }
}

impl From<&Configuration> for ConfigForm {
    fn from(config: &Configuration) -> Self {
        let function = &config.function;
        Self {
            function_name: function.function_name.to_string(),
            region: config.region.clone(),
            description: function.description.clone(),
            role: function.role.clone(),
            handler: function.handler.to_string(),
            memory_size: function.memory_size.megabytes().to_string(),
            timeout: function.timeout.seconds().to_string(),
            runtime: function.runtime.clone(),
        }
    }
}

impl ConfigForm {
    /// Validate the answers and convert them into a configuration record.
    pub fn validate(self) -> Result<Configuration, ValidationError> {
        let memory_size = positive_integer("MemorySize", &self.memory_size)?;
        let timeout = positive_integer("Timeout", &self.timeout)?;

        Ok(Configuration {
            region: required("Region", self.region)?,
            function: FunctionOptions {
                function_name: FunctionName::new(self.function_name.trim())?,
                description: self.description.trim().to_string(),
                role: required("Role", self.role)?,
                handler: Handler::new(self.handler.trim())?,
                memory_size: MemorySize::new(memory_size)?,
                timeout: Timeout::new(timeout)?,
                runtime: required("Runtime", self.runtime)?,
            },
        })
    }
}

/// Reads and writes the workspace's configuration file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn for_workspace(workspace: &Workspace) -> Self {
        Self::new(workspace.config_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the record. A missing file is `Ok(None)`, one that does not
    /// parse or validate is `ConfigCorrupt`, and a read failure is `Io`.
    pub fn load(&self) -> FnkitResult<Option<Configuration>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No configuration record");
                return Ok(None);
            }
            Err(e) => return Err(FnkitError::io("reading configuration file", e)),
        };

        let config: Configuration =
            serde_json::from_str(&content).map_err(|e| FnkitError::ConfigCorrupt {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        Ok(Some(config))
    }

    /// Load the record, failing with `NotConfigured` when it does not exist.
    pub fn require(&self) -> FnkitResult<Configuration> {
        self.load()?.ok_or_else(|| FnkitError::NotConfigured {
            path: self.path.clone(),
        })
    }

    /// Overwrite the record in full.
    pub fn save(&self, config: &Configuration) -> FnkitResult<()> {
        let mut content = serde_json::to_string_pretty(config).map_err(|e| {
            FnkitError::io("serializing configuration", std::io::Error::other(e))
        })?;
        content.push('\n');

        std::fs::write(&self.path, content)
            .map_err(|e| FnkitError::io("writing configuration file", e))?;

        tracing::debug!(path = %self.path.display(), "Configuration saved");
        Ok(())
    }
}
