// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `fnkit update`, `update-config` and `update-code` commands.

use std::path::Path;

use fnkit_core::{FunctionSummary, RemoteResult};

use super::CommandResult;
use crate::render;

fn report(outcome: RemoteResult<FunctionSummary>, what: &str, verbose: bool) {
    match outcome {
        Ok(summary) => {
            render::success(format_args!("lambda {} {} updated", summary.function_name, what));
            render::details(&summary, verbose);
        }
        Err(e) => render::failure(&e),
    }
}

pub async fn execute(dir: &Path, verbose: bool) -> CommandResult {
    let deployer = super::deployer(dir)?;
    let outcome = deployer.update().await;

    report(outcome.config, "config", verbose);
    report(outcome.code?, "code", verbose);
    Ok(())
}

pub async fn execute_config(dir: &Path, verbose: bool) -> CommandResult {
    let deployer = super::deployer(dir)?;
    report(deployer.update_config().await, "config", verbose);
    Ok(())
}

pub async fn execute_code(dir: &Path, verbose: bool) -> CommandResult {
    let deployer = super::deployer(dir)?;
    report(deployer.update_code().await?, "code", verbose);
    Ok(())
}
