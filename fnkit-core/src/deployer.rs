// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Function lifecycle operations for a configured workspace.
//!
//! A `Deployer` only exists for a workspace whose configuration loaded
//! successfully, so every guarded command fails before touching the
//! packager or the function service when the workspace is unconfigured.
//!
//! Return types separate the two failure classes: the outer `FnkitResult`
//! carries local failures (fatal), the inner `RemoteResult` carries the
//! service's answer (reported, never fatal).

use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::config::{ConfigForm, ConfigStore, Configuration};
use crate::error::{FnkitError, FnkitResult, RemoteResult};
use crate::manifest;
use crate::packager::Packager;
use crate::payload::{load_payload, ResponseBody};
use crate::prompt::Prompter;
use crate::runtime::{LocalInvocation, LocalRuntime};
use crate::service::{FunctionService, FunctionSummary, LogEvent};
use crate::tail::LogTail;
use crate::workspace::Workspace;

/// Outcome of `update`: both steps always run.
#[derive(Debug)]
pub struct UpdateReport {
    pub config: RemoteResult<FunctionSummary>,
    pub code: FnkitResult<RemoteResult<FunctionSummary>>,
}

/// Outcome of a remote invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub response: ResponseBody,
    /// Function-level error kind reported by the service, if any.
    pub function_error: Option<String>,
    /// Whether a payload file was found and sent.
    pub sent_payload: bool,
}

pub struct Deployer<S, P> {
    workspace: Workspace,
    config: Configuration,
    service: S,
    packager: P,
}

impl<S, P> Deployer<S, P>
where
    S: FunctionService,
    P: Packager,
{
    pub fn new(workspace: Workspace, config: Configuration, service: S, packager: P) -> Self {
        Self {
            workspace,
            config,
            service,
            packager,
        }
    }

    /// Load the workspace's configuration. Fails with `NotConfigured` when
    /// there is none.
    pub fn for_workspace(workspace: Workspace, service: S, packager: P) -> FnkitResult<Self> {
        let config = ConfigStore::for_workspace(&workspace).require()?;
        tracing::debug!(
            function = %config.function.function_name,
            region = %config.region,
            "Configuration loaded"
        );
        Ok(Self::new(workspace, config, service, packager))
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    fn package(&self) -> FnkitResult<Vec<u8>> {
        self.packager.build(&self.workspace.source_dir())
    }

    pub async fn create(&self) -> FnkitResult<RemoteResult<FunctionSummary>> {
        let archive = self.package()?;
        tracing::info!(
            function = %self.config.function.function_name,
            bytes = archive.len(),
            "Creating function"
        );
        Ok(self
            .service
            .create(&self.config.region, &self.config.function, &archive)
            .await)
    }

    pub async fn update_config(&self) -> RemoteResult<FunctionSummary> {
        tracing::info!(function = %self.config.function.function_name, "Updating function configuration");
        self.service
            .update_configuration(&self.config.region, &self.config.function)
            .await
    }

    pub async fn update_code(&self) -> FnkitResult<RemoteResult<FunctionSummary>> {
        let archive = self.package()?;
        tracing::info!(
            function = %self.config.function.function_name,
            bytes = archive.len(),
            "Updating function code"
        );
        Ok(self
            .service
            .update_code(&self.config.region, &self.config.function.function_name, &archive)
            .await)
    }

    /// Configuration first, then code. The code step runs whatever the
    /// outcome of the configuration step.
    pub async fn update(&self) -> UpdateReport {
        let config = self.update_config().await;
        if let Err(e) = &config {
            tracing::debug!(error = %e, "Configuration update failed, updating code anyway");
        }
        let code = self.update_code().await;
        UpdateReport { config, code }
    }

    /// Delete the remote function. The local record is kept.
    pub async fn delete(&self) -> RemoteResult<()> {
        tracing::info!(function = %self.config.function.function_name, "Deleting function");
        self.service
            .delete(&self.config.region, &self.config.function.function_name)
            .await
    }

    pub async fn invoke(&self) -> RemoteResult<Invocation> {
        let payload = load_payload(&self.workspace.payload_path());
        let reply = self
            .service
            .invoke(
                &self.config.region,
                &self.config.function.function_name,
                payload.as_ref(),
            )
            .await?;

        tracing::debug!(
            status = reply.status,
            function_error = ?reply.function_error,
            "Invocation finished"
        );
        Ok(Invocation {
            response: ResponseBody::parse(&reply.payload),
            function_error: reply.function_error,
            sent_payload: payload.is_some(),
        })
    }

    pub async fn invoke_local<R>(&self, runtime: &R) -> FnkitResult<LocalInvocation>
    where
        R: LocalRuntime + ?Sized,
    {
        let payload = load_payload(&self.workspace.payload_path());
        runtime
            .invoke(
                &self.workspace.source_dir(),
                &self.config.function,
                payload.as_ref(),
            )
            .await
    }

    /// Poll the function's logs every `interval`, handing each batch (or
    /// poll failure) to `on_batch`. Never returns.
    pub async fn follow_logs<F>(&self, mut tail: LogTail, interval: Duration, mut on_batch: F)
    where
        F: FnMut(RemoteResult<Vec<LogEvent>>),
    {
        let name = &self.config.function.function_name;
        tracing::info!(log_group = %name.log_group(), "Following function logs");

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            on_batch(tail.poll(&self.service, &self.config.region, name).await);
        }
    }
}

/// Run the `configure` flow: prompt with the current values, validate,
/// then save the record and the function manifest. The manifest is read
/// before anything is written, so a malformed one leaves both untouched.
/// Never talks to the service.
pub fn configure<P>(workspace: &Workspace, prompter: &P) -> FnkitResult<Configuration>
where
    P: Prompter + ?Sized,
{
    let store = ConfigStore::for_workspace(workspace);
    let defaults = match store.load() {
        Ok(Some(existing)) => ConfigForm::from(&existing),
        Ok(None) => ConfigForm::default(),
        Err(e @ FnkitError::ConfigCorrupt { .. }) => {
            tracing::warn!(error = %e, "Existing configuration ignored, starting from defaults");
            ConfigForm::default()
        }
        Err(e) => return Err(e),
    };

    let config = prompter.configuration(defaults)?.validate()?;
    let manifest = manifest::prepare(&workspace.manifest_path(), &config.function)?;
    store.save(&config)?;
    if let Some(manifest) = manifest {
        manifest.write()?;
    }

    tracing::info!(
        function = %config.function.function_name,
        path = %store.path().display(),
        "Configuration saved"
    );
    Ok(config)
}
