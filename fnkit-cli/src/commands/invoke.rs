// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `fnkit invoke` and `invoke-local` commands.

use std::path::Path;

use fnkit_core::ProcessRuntime;

use super::CommandResult;
use crate::render;

pub async fn execute(dir: &Path) -> CommandResult {
    let deployer = super::deployer(dir)?;

    match deployer.invoke().await {
        Ok(invocation) => {
            if !invocation.sent_payload {
                tracing::info!("Invoked without payload");
            }
            if let Some(kind) = &invocation.function_error {
                eprintln!("✗ Function error ({})", kind);
            }
            println!("{}", invocation.response);
        }
        Err(e) => render::failure(&e),
    }
    Ok(())
}

pub async fn execute_local(dir: &Path) -> CommandResult {
    let deployer = super::deployer(dir)?;
    let invocation = deployer.invoke_local(&ProcessRuntime::new()).await?;

    if !invocation.logs.is_empty() {
        eprint!("{}", invocation.logs);
    }
    println!("{}", invocation.result);
    Ok(())
}
