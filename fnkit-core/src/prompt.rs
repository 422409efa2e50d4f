// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Interactive input boundary.

use crate::config::ConfigForm;
use crate::error::FnkitResult;
use crate::scaffold::ProjectForm;

/// Collects answers from the user.
///
/// Every form is pre-filled with defaults; implementations return the form
/// with the user's answers (a blank answer keeps the default).
pub trait Prompter {
    fn configuration(&self, defaults: ConfigForm) -> FnkitResult<ConfigForm>;

    fn project(&self, defaults: ProjectForm) -> FnkitResult<ProjectForm>;

    fn confirm(&self, message: &str, default: bool) -> FnkitResult<bool>;
}
