// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `fnkit delete` command - Delete the remote function.

use std::path::Path;

use super::CommandResult;
use crate::render;

pub async fn execute(dir: &Path) -> CommandResult {
    let deployer = super::deployer(dir)?;

    match deployer.delete().await {
        Ok(()) => render::success(format_args!(
            "lambda {} deleted",
            deployer.config().function.function_name
        )),
        Err(e) => render::failure(&e),
    }
    Ok(())
}
