// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `fnkit new` command - Scaffold a function project.

use std::path::Path;

use fnkit_core::{new_project, FnkitError, UserDefaults};

use super::CommandResult;
use crate::prompter::TerminalPrompter;

pub async fn execute(dir: &Path) -> CommandResult {
    let defaults_path = UserDefaults::default_path();

    match new_project(dir, &TerminalPrompter, defaults_path.as_deref()) {
        Ok(project) => {
            println!("✓ Project created in {}", project.display());
            println!();
            println!("Next steps:");
            println!("  cd {}", project.display());
            println!("  fnkit configure");
            Ok(())
        }
        Err(FnkitError::ScaffoldAborted) => {
            eprintln!("✗ Scaffolding process aborted.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
