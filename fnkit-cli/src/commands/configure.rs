// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `fnkit configure` command - Set up the function details.

use std::path::Path;

use fnkit_core::{configure, Workspace};

use super::CommandResult;
use crate::prompter::TerminalPrompter;

pub async fn execute(dir: &Path) -> CommandResult {
    let workspace = Workspace::new(dir);
    let config = configure(&workspace, &TerminalPrompter)?;

    println!();
    println!("{}", serde_json::to_string_pretty(&config)?);
    println!();
    println!("✓ Lambda configuration saved");
    Ok(())
}
