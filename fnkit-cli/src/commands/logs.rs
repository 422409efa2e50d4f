// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `fnkit logs` command - Follow the function's logs.

use std::path::Path;

use fnkit_core::{LogTail, POLL_INTERVAL};

use super::CommandResult;
use crate::render;

pub async fn execute(dir: &Path, since_secs: u32) -> CommandResult {
    let deployer = super::deployer(dir)?;
    let tail = match since_secs {
        0 => LogTail::starting_now(),
        secs => LogTail::since(chrono::Utc::now().timestamp_millis() - i64::from(secs) * 1000),
    };

    println!(
        "Following {} (Ctrl+C to stop)",
        deployer.config().function.function_name.log_group()
    );

    let follow = deployer.follow_logs(tail, POLL_INTERVAL, |batch| match batch {
        Ok(events) => events.iter().for_each(render::log_event),
        Err(e) => render::failure(&e),
    });

    tokio::select! {
        _ = follow => {}
        signal = tokio::signal::ctrl_c() => {
            signal?;
            tracing::debug!("Stopped following logs");
        }
    }
    Ok(())
}
