// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Log tailing cursor.
//!
//! Each poll asks for events at or after the cursor and moves the cursor
//! one millisecond past the newest event returned, so an event is reported
//! at most once.

use crate::error::RemoteResult;
use crate::service::{FunctionService, LogEvent};
use crate::types::FunctionName;

/// Interval between log polls.
pub const POLL_INTERVAL: std::time::Duration = std::time::Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogTail {
    cursor_ms: i64,
}

impl LogTail {
    /// Start tailing at `since_ms` (milliseconds since the Unix epoch).
    pub fn since(since_ms: i64) -> Self {
        Self {
            cursor_ms: since_ms,
        }
    }

    /// Start tailing from the current wall-clock time.
    pub fn starting_now() -> Self {
        Self::since(chrono::Utc::now().timestamp_millis())
    }

    pub fn cursor(&self) -> i64 {
        self.cursor_ms
    }

    /// Fetch events not reported yet, oldest first.
    ///
    /// A failed poll leaves the cursor where it was.
    pub async fn poll<S>(
        &mut self,
        service: &S,
        region: &str,
        name: &FunctionName,
    ) -> RemoteResult<Vec<LogEvent>>
    where
        S: FunctionService + ?Sized,
    {
        let mut events = service.tail_logs(region, name, self.cursor_ms).await?;
        events.retain(|event| event.timestamp >= self.cursor_ms);
        events.sort_by_key(|event| event.timestamp);

        if let Some(last) = events.last() {
            self.cursor_ms = last.timestamp + 1;
        }

        tracing::debug!(
            function = %name,
            events = events.len(),
            cursor = self.cursor_ms,
            "Polled function logs"
        );
        Ok(events)
    }
}
