// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! Immutable record of a single scheduled-command execution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for one [`CommandRun`].
    pub struct RunId("run-");
}

/// Immutable record of a single execution of a [`crate::ScheduledCommand`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRun {
    pub id: RunId,
    pub command_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub exit_code: Option<i32>,
    pub stdout_excerpt: String,
    pub stderr_excerpt: String,
    pub note: Option<String>,
}

impl CommandRun {
    pub fn overlaps(&self, other: &CommandRun) -> bool {
        let self_end = self.finished_at.unwrap_or(DateTime::<Utc>::MAX_UTC);
        let other_end = other.finished_at.unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.started_at < other_end && other.started_at < self_end
    }
}

#[cfg(test)]
#[path = "command_run_tests.rs"]
mod tests;
