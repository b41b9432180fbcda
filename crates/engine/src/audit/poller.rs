// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! The audit poller (spec §4.5): candidate detection, cooldown
//! filtering, selection, and the persist-before-handoff safety
//! property that makes a crash mid-audit not cause immediate re-audit.

use ampa_adapters::{Worklog, WorklogError};
use ampa_core::{Clock, WorkItem};
use ampa_store::SchedulerStore;
use chrono::{DateTime, Utc};
use tracing::warn;

/// Selects the oldest `in_review` candidate past its per-item cooldown
/// and records the audit timestamp *before* returning it, so a crash
/// during the subsequent audit run doesn't cause an immediate re-audit
/// on restart (spec §4.5 step 4, the poller's key safety property).
///
/// Returns `None` when every candidate is filtered out, or the stage
/// query returns nothing — callers emit a "no candidates" notification
/// in that case (spec §4.5 step 6).
pub async fn select_and_claim(
    worklog: &dyn Worklog,
    store: &SchedulerStore,
    clock: &impl Clock,
    cooldown_hours: i64,
) -> Result<Option<WorkItem>, WorklogError> {
    let mut candidates = worklog.list_by_stage("in_review").await?;
    let now = clock.now_utc();

    candidates.retain(|item| match store.get_last_audit(item.id.as_str()) {
        Some(last) => now - last >= chrono::Duration::hours(cooldown_hours),
        None => true,
    });

    candidates.sort_by_key(|item| item.updated_at.unwrap_or(DateTime::<Utc>::MIN_UTC));

    let Some(selected) = candidates.into_iter().next() else {
        return Ok(None);
    };

    store.set_last_audit(selected.id.as_str(), now);
    // Write failures are non-fatal for the scheduler loop (spec §4.1);
    // the selection still stands, the next tick simply retries the save.
    if let Err(e) = store.save() {
        warn!(error = %e, item_id = %selected.id, "failed to persist audit cooldown before handoff");
    }
    Ok(Some(selected))
}

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;
