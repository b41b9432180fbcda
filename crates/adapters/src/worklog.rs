// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! The `Worklog` capability: every way the engine touches work items, all
//! routed through the worklog CLI (spec §6). The core never parses the
//! backing file directly.

use ampa_core::{Status, Stage, WorkItem, WorkItemId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorklogError {
    #[error("worklog CLI exited with status {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    #[error("failed to spawn worklog CLI: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("failed to parse worklog CLI output: {0}")]
    Parse(String),
}

/// A partial update applied to one work item via `update`/`comment add`
/// (spec §6). Only populated fields are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkItemUpdate {
    pub status: Option<Status>,
    pub stage: Option<Stage>,
    pub assignee: Option<String>,
    #[serde(default)]
    pub add_tags: Vec<String>,
    #[serde(default)]
    pub remove_tags: Vec<String>,
    pub needs_producer_review: Option<bool>,
}

#[async_trait]
pub trait Worklog: Send + Sync + 'static {
    /// `show <id>`: a single work item record, e.g. to resolve a child id
    /// discovered via `WorkItem::children` into its current status.
    async fn show(&self, id: &WorkItemId) -> Result<WorkItem, WorklogError>;
    async fn list_by_stage(&self, stage: &str) -> Result<Vec<WorkItem>, WorklogError>;
    async fn list_in_progress(&self) -> Result<Vec<WorkItem>, WorklogError>;
    /// `wl next -n <n>`: prioritized candidate list.
    async fn next(&self, n: usize) -> Result<Vec<WorkItem>, WorklogError>;
    async fn update(&self, id: &WorkItemId, update: WorkItemUpdate) -> Result<(), WorklogError>;
    async fn add_comment(&self, id: &WorkItemId, author: &str, body: &str) -> Result<(), WorklogError>;
}

/// Accepts either a bare JSON array or `{"items": [...]}`, dedups by id
/// (spec §4.5 step 1: "Normalize the response shape, list/dict tolerant,
/// dedup by id").
pub fn normalize_list_response(value: serde_json::Value) -> Result<Vec<WorkItem>, WorklogError> {
    let items: Vec<WorkItem> = match value {
        serde_json::Value::Array(_) => serde_json::from_value(value)
            .map_err(|e| WorklogError::Parse(e.to_string()))?,
        serde_json::Value::Object(ref map) if map.contains_key("items") => {
            serde_json::from_value(map["items"].clone())
                .map_err(|e| WorklogError::Parse(e.to_string()))?
        }
        serde_json::Value::Object(map) => map
            .into_values()
            .map(serde_json::from_value)
            .collect::<Result<Vec<WorkItem>, _>>()
            .map_err(|e| WorklogError::Parse(e.to_string()))?,
        other => return Err(WorklogError::Parse(format!("unexpected shape: {other}"))),
    };

    let mut seen = std::collections::HashSet::new();
    let mut deduped = Vec::with_capacity(items.len());
    for item in items {
        if seen.insert(item.id.clone()) {
            deduped.push(item);
        }
    }
    Ok(deduped)
}

#[cfg(test)]
#[path = "worklog_tests.rs"]
mod tests;

pub mod process;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeWorklog;
pub use process::ProcessWorklog;
