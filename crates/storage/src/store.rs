// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! The scheduler store: a single JSON document with an internal mutex,
//! atomic tmp-then-rename writes (spec §3, §4.1).

use crate::document::{InFlightClaim, SchedulerStoreDoc};
use crate::error::{StoreError, StoreResult};
use ampa_core::{CommandRun, ScheduledCommand};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A JSON-document-backed store for scheduler state.
///
/// All reads/writes to the in-memory document go through a single
/// mutex; `save` is the only place that touches disk, and it writes to
/// a sibling `.tmp` file, fsyncs it, then renames it into place so a
/// reader never observes a half-written file.
pub struct SchedulerStore {
    path: PathBuf,
    doc: Mutex<SchedulerStoreDoc>,
}

impl SchedulerStore {
    /// Load the store from `path`. A missing file yields an empty store
    /// with zero-valued subtrees (spec §3) rather than an error.
    /// Malformed JSON fails loudly; the file is left untouched so an
    /// operator can inspect or repair it.
    pub fn load(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let doc = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|source| StoreError::Malformed { path: path.clone(), source })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => SchedulerStoreDoc::default(),
            Err(source) => return Err(StoreError::Read { path: path.clone(), source }),
        };
        Ok(Self { path, doc: Mutex::new(doc) })
    }

    /// Persist the current document to disk atomically.
    pub fn save(&self) -> StoreResult<()> {
        let doc = self.doc.lock();
        self.write_atomic(&doc)
    }

    fn write_atomic(&self, doc: &SchedulerStoreDoc) -> StoreResult<()> {
        let json = serde_json::to_vec_pretty(doc)
            .map_err(|source| StoreError::Malformed { path: self.path.clone(), source })?;

        let tmp_path = Self::tmp_path(&self.path);
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;
        }

        let write_tmp = || -> std::io::Result<()> {
            let mut file = File::create(&tmp_path)?;
            file.write_all(&json)?;
            file.sync_all()
        };
        write_tmp().map_err(|source| StoreError::Write { path: tmp_path.clone(), source })?;

        fs::rename(&tmp_path, &self.path)
            .map_err(|source| StoreError::Write { path: self.path.clone(), source })?;
        Ok(())
    }

    fn tmp_path(path: &Path) -> PathBuf {
        let mut name = path.file_name().and_then(|n| n.to_str()).unwrap_or("store").to_string();
        name.push_str(".tmp");
        path.with_file_name(name)
    }

    /// Known-subpath getter: the registered commands.
    pub fn commands(&self) -> Vec<ScheduledCommand> {
        self.doc.lock().commands.values().cloned().collect()
    }

    pub fn set_commands(&self, commands: Vec<ScheduledCommand>) {
        let mut doc = self.doc.lock();
        doc.commands = commands.into_iter().map(|c| (c.command_id.as_str().to_string(), c)).collect();
    }

    pub fn last_run_at(&self, command_id: &str) -> Option<DateTime<Utc>> {
        self.doc.lock().state.last_run_at.get(command_id).copied()
    }

    pub fn set_last_run_at(&self, command_id: &str, at: DateTime<Utc>) {
        self.doc.lock().state.last_run_at.insert(command_id.to_string(), at);
    }

    pub fn get_last_audit(&self, item_id: &str) -> Option<DateTime<Utc>> {
        self.doc.lock().state.last_audit_at_by_item.get(item_id).copied()
    }

    /// Record an audit timestamp for `item_id`. Enforces the store
    /// invariant that `last_audit_at_by_item` is monotonically
    /// non-decreasing per item (spec §3) by ignoring an older-or-equal
    /// write rather than erroring — the poller only ever calls this with
    /// `now`, so a regression here means a clock went backwards, not a
    /// caller bug worth failing the tick over.
    pub fn set_last_audit(&self, item_id: &str, at: DateTime<Utc>) {
        let mut doc = self.doc.lock();
        let should_write = match doc.state.last_audit_at_by_item.get(item_id) {
            Some(existing) => at > *existing,
            None => true,
        };
        if should_write {
            doc.state.last_audit_at_by_item.insert(item_id.to_string(), at);
        }
    }

    /// Append a run record to `command_id`'s history, trimming to the
    /// most recent [`crate::document::MAX_HISTORY_PER_COMMAND`] entries.
    pub fn record_run(&self, command_id: &str, run: CommandRun) {
        self.doc.lock().push_run(command_id, run);
    }

    pub fn history(&self, command_id: &str) -> Vec<CommandRun> {
        self.doc
            .lock()
            .state
            .history
            .get(command_id)
            .map(|h| h.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Claim `command_id` as in-flight under `pid`, stamped with
    /// `started_at` (the caller's injected [`Clock`](ampa_core::Clock),
    /// never read here). Returns `Ok(())` on success,
    /// `Err(StoreError::Busy)` if another pid already holds the claim
    /// (spec §4.2's single-flight invariant).
    pub fn claim_in_flight(&self, command_id: &str, pid: u32, started_at: DateTime<Utc>) -> StoreResult<()> {
        let mut doc = self.doc.lock();
        if let Some(existing) = doc.state.in_flight.get(command_id) {
            return Err(StoreError::Busy { command_id: command_id.to_string(), pid: existing.pid });
        }
        doc.state.in_flight.insert(command_id.to_string(), InFlightClaim { pid, started_at });
        Ok(())
    }

    pub fn release_in_flight(&self, command_id: &str) {
        self.doc.lock().state.in_flight.shift_remove(command_id);
    }

    pub fn is_in_flight(&self, command_id: &str) -> bool {
        self.doc.lock().state.in_flight.contains_key(command_id)
    }

    /// The in-flight claim record for `command_id`, if one is held.
    pub fn in_flight_claim(&self, command_id: &str) -> Option<InFlightClaim> {
        self.doc.lock().state.in_flight.get(command_id).cloned()
    }

    /// Stale in-flight claims whose pid is no longer alive and whose
    /// ownership check fails are cleared on restart (spec §4.2). Callers
    /// pass a predicate answering "is this pid still a live, owned AMPA
    /// process" — `ampa-daemon` supplies the real `/proc` check.
    pub fn clear_stale_in_flight(&self, is_live: impl Fn(u32) -> bool) {
        let mut doc = self.doc.lock();
        doc.state.in_flight.retain(|_, claim| is_live(claim.pid));
    }

    /// Drop history beyond the retention window for every command. Safe
    /// to call opportunistically; `record_run` already trims per-command
    /// but this also clears history for commands no longer registered.
    pub fn compact_history(&self) {
        let mut doc = self.doc.lock();
        let known: std::collections::HashSet<String> = doc.commands.keys().cloned().collect();
        doc.state.history.retain(|id, _| known.contains(id));
    }

    pub fn last_global_start_ts(&self) -> Option<DateTime<Utc>> {
        self.doc.lock().last_global_start_ts
    }

    pub fn set_last_global_start_ts(&self, at: DateTime<Utc>) {
        self.doc.lock().last_global_start_ts = Some(at);
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
