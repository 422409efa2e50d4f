// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Terminal prompts backed by dialoguer.

use dialoguer::{Confirm, Input};
use fnkit_core::{ConfigForm, FnkitError, FnkitResult, ProjectForm, Prompter};

pub struct TerminalPrompter;

fn prompt_error(err: dialoguer::Error) -> FnkitError {
    FnkitError::Prompt {
        message: err.to_string(),
    }
}

/// Ask one question. Enter keeps `default`.
fn ask(prompt: &str, default: String) -> FnkitResult<String> {
    let mut input = Input::<String>::new().with_prompt(prompt).allow_empty(true);
    if !default.is_empty() {
        input = input.default(default);
    }
    input.interact_text().map_err(prompt_error)
}

impl Prompter for TerminalPrompter {
    fn configuration(&self, defaults: ConfigForm) -> FnkitResult<ConfigForm> {
        Ok(ConfigForm {
            function_name: ask("Function name", defaults.function_name)?,
            region: ask("Region", defaults.region)?,
            description: ask("Description", defaults.description)?,
            role: ask("Role arn", defaults.role)?,
            handler: ask("Handler", defaults.handler)?,
            memory_size: ask("MemorySize", defaults.memory_size)?,
            timeout: ask("Timeout", defaults.timeout)?,
            runtime: ask("Runtime", defaults.runtime)?,
        })
    }

    fn project(&self, defaults: ProjectForm) -> FnkitResult<ProjectForm> {
        Ok(ProjectForm {
            name: ask("Project name", defaults.name)?,
            version: ask("Project version", defaults.version)?,
            description: ask("Project description", defaults.description)?,
            author_name: ask("Project author name", defaults.author_name)?,
            author_email: ask("Project author email", defaults.author_email)?,
            repo_type: ask("Project repo type", defaults.repo_type)?,
            repo_url: ask("Project repo url", defaults.repo_url)?,
            license: ask("Project license", defaults.license)?,
        })
    }

    fn confirm(&self, message: &str, default: bool) -> FnkitResult<bool> {
        Confirm::new()
            .with_prompt(message)
            .default(default)
            .interact()
            .map_err(prompt_error)
    }
}
