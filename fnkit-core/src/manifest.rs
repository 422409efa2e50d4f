// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Keeps the function's own `package.json` in step with the configuration.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::FunctionOptions;
use crate::error::{FnkitError, FnkitResult};

/// A manifest with the configured name and description applied, not yet
/// written back.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestUpdate {
    path: PathBuf,
    manifest: Value,
}

impl ManifestUpdate {
    pub fn manifest(&self) -> &Value {
        &self.manifest
    }

    pub fn write(&self) -> FnkitResult<()> {
        let mut content = serde_json::to_string_pretty(&self.manifest).map_err(|e| {
            FnkitError::io("serializing function manifest", std::io::Error::other(e))
        })?;
        content.push('\n');
        std::fs::write(&self.path, content)
            .map_err(|e| FnkitError::io("writing function manifest", e))?;

        tracing::debug!(path = %self.path.display(), "Function manifest synced");
        Ok(())
    }
}

/// Read the manifest at `path` and set the configured name and description,
/// leaving every other key (and the key order) untouched. Nothing is written.
///
/// Returns `None` when the manifest does not exist.
pub fn prepare(path: &Path, options: &FunctionOptions) -> FnkitResult<Option<ManifestUpdate>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "Function manifest not found, skipping sync");
            return Ok(None);
        }
        Err(e) => return Err(FnkitError::io("reading function manifest", e)),
    };

    let malformed = |message: String| FnkitError::ManifestParse {
        path: path.to_path_buf(),
        message,
    };

    let mut manifest: Value = serde_json::from_str(&content).map_err(|e| malformed(e.to_string()))?;
    let fields = manifest
        .as_object_mut()
        .ok_or_else(|| malformed("expected a JSON object".to_string()))?;

    fields.insert(
        "name".to_string(),
        Value::String(options.function_name.to_string()),
    );
    fields.insert(
        "description".to_string(),
        Value::String(options.description.clone()),
    );

    Ok(Some(ManifestUpdate {
        path: path.to_path_buf(),
        manifest,
    }))
}
