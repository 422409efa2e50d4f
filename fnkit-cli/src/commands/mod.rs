// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! CLI command modules.

use std::path::Path;

use fnkit_core::{Deployer, FnkitResult, LambdaClient, ServiceSettings, Workspace, ZipPackager};

pub mod configure;
pub mod create;
pub mod delete;
pub mod invoke;
pub mod logs;
pub mod new;
pub mod update;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Deployer for the workspace at `dir`, talking to the function service.
///
/// Fails with `NotConfigured` when the workspace has no configuration
/// record; no request is made in that case.
pub fn deployer(dir: &Path) -> FnkitResult<Deployer<LambdaClient, ZipPackager>> {
    let client = LambdaClient::new(ServiceSettings::from_env())?;
    Deployer::for_workspace(Workspace::new(dir), client, ZipPackager::new())
}
