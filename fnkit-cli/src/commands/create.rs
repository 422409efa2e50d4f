// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `fnkit create` command - Package and create the remote function.

use std::path::Path;

use super::CommandResult;
use crate::render;

pub async fn execute(dir: &Path, verbose: bool) -> CommandResult {
    let deployer = super::deployer(dir)?;

    match deployer.create().await? {
        Ok(summary) => {
            render::success(format_args!("lambda {} created", summary.function_name));
            render::details(&summary, verbose);
        }
        Err(e) => render::failure(&e),
    }
    Ok(())
}
