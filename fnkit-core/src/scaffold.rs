// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Project scaffolding for `fnkit new`.
//!
//! Templates are compiled into the binary. Placeholders of the form
//! `%token%` are replaced with the answers from the project form; values
//! substituted into JSON templates are JSON-escaped.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FnkitError, FnkitResult, ValidationError};
use crate::prompt::Prompter;
use crate::workspace::{PAYLOAD_FILE, SOURCE_DIR};

const DEFAULT_PROJECT_NAME: &str = "test-lambda";
const DEFAULT_VERSION: &str = "0.0.0";
const DEFAULT_REPO_TYPE: &str = "git";
const DEFAULT_LICENSE: &str = "MIT";

const USER_DEFAULTS_FILE: &str = "user_defaults.json";

/// Answers collected by the `new` prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectForm {
    pub name: String,
    pub version: String,
    pub description: String,
    pub author_name: String,
    pub author_email: String,
    pub repo_type: String,
    pub repo_url: String,
    pub license: String,
}

impl Default for ProjectForm {
    fn default() -> Self {
        Self {
            name: DEFAULT_PROJECT_NAME.to_string(),
            version: DEFAULT_VERSION.to_string(),
            description: String::new(),
            author_name: String::new(),
            author_email: String::new(),
            repo_type: DEFAULT_REPO_TYPE.to_string(),
            repo_url: String::new(),
            license: DEFAULT_LICENSE.to_string(),
        }
    }
}

impl ProjectForm {
    /// Defaults overlaid with the answers remembered from the last run.
    pub fn with_user_defaults(saved: &UserDefaults) -> Self {
        let mut form = Self::default();
        if let Some(name) = &saved.author_name {
            form.author_name = name.clone();
        }
        if let Some(email) = &saved.author_email {
            form.author_email = email.clone();
        }
        if let Some(repo_type) = &saved.repo_type {
            form.repo_type = repo_type.clone();
        }
        if let Some(license) = &saved.license {
            form.license = license.clone();
        }
        form
    }

    fn validate_name(&self) -> Result<(), ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingRequiredField {
                field: "ProjectName",
            });
        }
        if name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(ValidationError::InvalidFieldValue {
                field: "ProjectName",
                value: name.to_string(),
                reason: "Must be a plain folder name".to_string(),
            });
        }
        Ok(())
    }
}

/// Answers remembered between `new` runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDefaults {
    pub author_name: Option<String>,
    pub author_email: Option<String>,
    pub repo_type: Option<String>,
    pub license: Option<String>,
}

impl From<&ProjectForm> for UserDefaults {
    fn from(form: &ProjectForm) -> Self {
        Self {
            author_name: Some(form.author_name.clone()),
            author_email: Some(form.author_email.clone()),
            repo_type: Some(form.repo_type.clone()),
            license: Some(form.license.clone()),
        }
    }
}

impl UserDefaults {
    /// `<config dir>/fnkit/user_defaults.json`, when the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("fnkit").join(USER_DEFAULTS_FILE))
    }

    /// Load saved defaults. Missing or unreadable files yield empty defaults.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), error = %e, "Cannot read user defaults");
                }
                return Self::default();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring malformed user defaults");
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) -> FnkitResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| FnkitError::io("creating user defaults directory", e))?;
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| FnkitError::io("serializing user defaults", std::io::Error::other(e)))?;
        std::fs::write(path, content).map_err(|e| FnkitError::io("writing user defaults", e))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

struct Template {
    path: &'static str,
    content: &'static str,
    format: Format,
}

const TEMPLATES: &[Template] = &[
    Template {
        path: ".editorconfig",
        content: include_str!("../templates/editorconfig"),
        format: Format::Text,
    },
    Template {
        path: ".eslintrc",
        content: include_str!("../templates/eslintrc"),
        format: Format::Text,
    },
    Template {
        path: ".gitignore",
        content: include_str!("../templates/gitignore"),
        format: Format::Text,
    },
    Template {
        path: PAYLOAD_FILE,
        content: include_str!("../templates/test-payload.json"),
        format: Format::Text,
    },
    Template {
        path: "package.json",
        content: include_str!("../templates/package.json"),
        format: Format::Json,
    },
    Template {
        path: "README.md",
        content: include_str!("../templates/README.md"),
        format: Format::Text,
    },
    Template {
        path: "src/index.js",
        content: include_str!("../templates/src/index.js"),
        format: Format::Text,
    },
    Template {
        path: "src/package.json",
        content: include_str!("../templates/src/package.json"),
        format: Format::Json,
    },
];

fn escape(value: &str, format: Format) -> String {
    match format {
        Format::Text => value.to_string(),
        Format::Json => {
            let quoted = serde_json::Value::String(value.to_string()).to_string();
            quoted[1..quoted.len() - 1].to_string()
        }
    }
}

/// Replace every known `%token%` in one pass. Substituted values are never
/// scanned again; unknown `%...%` text is kept as is.
fn render(content: &str, format: Format, tokens: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let known = after.find('%').and_then(|end| {
            let name = &after[..end];
            tokens
                .iter()
                .find(|(token, _)| *token == name)
                .map(|(_, value)| (end, *value))
        });

        match known {
            Some((end, value)) => {
                out.push_str(&escape(value, format));
                rest = &after[end + 1..];
            }
            None => {
                out.push('%');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Writes new projects under a parent directory.
#[derive(Debug, Clone)]
pub struct Scaffolder {
    parent: PathBuf,
}

impl Scaffolder {
    pub fn new(parent: impl Into<PathBuf>) -> Self {
        Self {
            parent: parent.into(),
        }
    }

    pub fn project_dir(&self, form: &ProjectForm) -> PathBuf {
        self.parent.join(form.name.trim())
    }

    /// Create the project folder. Fails with `ProjectExists` if it is
    /// already there; nothing is written in that case.
    pub fn scaffold(&self, form: &ProjectForm) -> FnkitResult<PathBuf> {
        form.validate_name()?;
        let dir = self.project_dir(form);
        if dir.exists() {
            return Err(FnkitError::ProjectExists { path: dir });
        }

        std::fs::create_dir_all(dir.join(SOURCE_DIR))
            .map_err(|e| FnkitError::io("creating project folder", e))?;

        let name = form.name.trim();
        let tokens: [(&str, &str); 8] = [
            ("name", name),
            ("version", &form.version),
            ("description", &form.description),
            ("author_name", &form.author_name),
            ("author_email", &form.author_email),
            ("repoType", &form.repo_type),
            ("repoUrl", &form.repo_url),
            ("license", &form.license),
        ];

        for template in TEMPLATES {
            let target = dir.join(template.path);
            std::fs::write(&target, render(template.content, template.format, &tokens))
                .map_err(|e| FnkitError::io("writing project file", e))?;
            tracing::debug!(file = %target.display(), "Scaffolded");
        }

        tracing::info!(project = name, path = %dir.display(), "Project scaffolded");
        Ok(dir)
    }
}

/// Run the `new` flow: prompt, remember defaults, scaffold.
///
/// When the folder already exists the user is asked whether to replace it;
/// declining returns `ScaffoldAborted` and leaves it untouched.
pub fn new_project<P>(
    parent: &Path,
    prompter: &P,
    defaults_path: Option<&Path>,
) -> FnkitResult<PathBuf>
where
    P: Prompter + ?Sized,
{
    let saved = defaults_path.map(UserDefaults::load).unwrap_or_default();
    let form = prompter.project(ProjectForm::with_user_defaults(&saved))?;
    form.validate_name()?;

    if let Some(path) = defaults_path {
        if let Err(e) = UserDefaults::from(&form).save(path) {
            tracing::warn!(error = %e, "Could not remember user defaults");
        }
    }

    let scaffolder = Scaffolder::new(parent);
    match scaffolder.scaffold(&form) {
        Err(FnkitError::ProjectExists { path }) => {
            let question = format!(
                "{} folder already exists! Do you want to delete it and continue with the new project?",
                form.name.trim()
            );
            if !prompter.confirm(&question, false)? {
                return Err(FnkitError::ScaffoldAborted);
            }

            tracing::info!(path = %path.display(), "Replacing existing project folder");
            std::fs::remove_dir_all(&path)
                .map_err(|e| FnkitError::io("removing existing project folder", e))?;
            scaffolder.scaffold(&form)
        }
        other => other,
    }
}
