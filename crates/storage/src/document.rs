// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! The on-disk shape of the scheduler store: a single JSON document
//! (spec §3, §4.1). No event sourcing, no WAL — `Load` reads the whole
//! file, `Save` writes the whole file back atomically.

use ampa_core::{CommandRun, ScheduledCommand};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const MAX_HISTORY_PER_COMMAND: usize = 50;

/// A claimed, presumably-running invocation of a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InFlightClaim {
    pub pid: u32,
    pub started_at: DateTime<Utc>,
}

/// The `state` subtree of the document (spec §3): everything the
/// scheduler mutates tick-to-tick, as opposed to `commands`, which is
/// operator-authored config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchedulerState {
    #[serde(default)]
    pub last_run_at: IndexMap<String, DateTime<Utc>>,

    #[serde(default)]
    pub last_audit_at_by_item: IndexMap<String, DateTime<Utc>>,

    #[serde(default)]
    pub in_flight: IndexMap<String, InFlightClaim>,

    #[serde(default)]
    pub history: IndexMap<String, VecDeque<CommandRun>>,
}

/// Root document persisted to the scheduler store file.
///
/// Unknown top-level keys are preserved verbatim across a load/save
/// round-trip via `extra`, so a newer binary's fields survive being
/// saved by an older one and vice versa.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchedulerStoreDoc {
    #[serde(default)]
    pub commands: IndexMap<String, ScheduledCommand>,

    #[serde(default)]
    pub state: SchedulerState,

    #[serde(default)]
    pub last_global_start_ts: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SchedulerStoreDoc {
    pub fn push_run(&mut self, command_id: &str, run: CommandRun) {
        let entry = self.state.history.entry(command_id.to_string()).or_default();
        entry.push_back(run);
        while entry.len() > MAX_HISTORY_PER_COMMAND {
            entry.pop_front();
        }
    }
}
