// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Fixed layout of a function project on disk.

use std::path::{Path, PathBuf};

/// Persisted configuration record.
pub const CONFIG_FILE: &str = "lambda_config.json";
/// Optional payload sent by `invoke` and `invoke-local`.
pub const PAYLOAD_FILE: &str = "test-payload.json";
/// Directory packaged into the deployment archive.
pub const SOURCE_DIR: &str = "src";
/// Function manifest inside the source directory.
pub const MANIFEST_FILE: &str = "package.json";

/// A project workspace rooted at a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn payload_path(&self) -> PathBuf {
        self.root.join(PAYLOAD_FILE)
    }

    pub fn source_dir(&self) -> PathBuf {
        self.root.join(SOURCE_DIR)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.source_dir().join(MANIFEST_FILE)
    }
}
