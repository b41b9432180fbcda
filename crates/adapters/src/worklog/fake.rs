// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! In-memory `Worklog` for tests, mirroring the real shell-out semantics
//! closely enough that engine tests don't need a real worklog CLI on PATH.

use crate::worklog::{WorkItemUpdate, Worklog, WorklogError};
use ampa_core::{Stage, WorkItem, WorkItemId};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// One recorded call, for assertions in tests that exercise the engine
/// against a `FakeWorklog`.
#[derive(Debug, Clone)]
pub enum WorklogCall {
    Update { id: WorkItemId, update: WorkItemUpdate },
    Comment { id: WorkItemId, author: String, body: String },
}

#[derive(Debug, Default)]
struct Inner {
    items: Vec<WorkItem>,
    calls: Vec<WorklogCall>,
}

/// Scripted, in-memory stand-in for [`super::ProcessWorklog`]. Seed it
/// with [`FakeWorklog::with_items`], then inspect [`FakeWorklog::calls`]
/// after exercising an engine component against it.
#[derive(Debug, Clone, Default)]
pub struct FakeWorklog {
    inner: Arc<Mutex<Inner>>,
}

impl FakeWorklog {
    pub fn with_items(items: Vec<WorkItem>) -> Self {
        Self { inner: Arc::new(Mutex::new(Inner { items, calls: Vec::new() })) }
    }

    pub fn calls(&self) -> Vec<WorklogCall> {
        self.inner.lock().calls.clone()
    }

    pub fn item(&self, id: &WorkItemId) -> Option<WorkItem> {
        self.inner.lock().items.iter().find(|w| &w.id == id).cloned()
    }

    pub fn push_item(&self, item: WorkItem) {
        self.inner.lock().items.push(item);
    }
}

#[async_trait]
impl Worklog for FakeWorklog {
    async fn show(&self, id: &WorkItemId) -> Result<WorkItem, WorklogError> {
        self.item(id).ok_or_else(|| WorklogError::Parse(format!("no such item {id}")))
    }

    async fn list_by_stage(&self, stage: &str) -> Result<Vec<WorkItem>, WorklogError> {
        Ok(self
            .inner
            .lock()
            .items
            .iter()
            .filter(|w| w.stage.as_str() == stage)
            .cloned()
            .collect())
    }

    async fn list_in_progress(&self) -> Result<Vec<WorkItem>, WorklogError> {
        Ok(self
            .inner
            .lock()
            .items
            .iter()
            .filter(|w| w.status.is_in_progress())
            .cloned()
            .collect())
    }

    async fn next(&self, n: usize) -> Result<Vec<WorkItem>, WorklogError> {
        Ok(self
            .inner
            .lock()
            .items
            .iter()
            .filter(|w| matches!(w.stage, Stage::Idea | Stage::IntakeComplete | Stage::PlanComplete))
            .take(n)
            .cloned()
            .collect())
    }

    async fn update(&self, id: &WorkItemId, update: WorkItemUpdate) -> Result<(), WorklogError> {
        let mut inner = self.inner.lock();
        if let Some(item) = inner.items.iter_mut().find(|w| &w.id == id) {
            if let Some(status) = update.status.clone() {
                item.status = status;
            }
            if let Some(stage) = update.stage.clone() {
                item.stage = stage;
            }
            if update.assignee.is_some() {
                item.assignee = update.assignee.clone();
            }
            for tag in &update.add_tags {
                if !item.tags.contains(tag) {
                    item.tags.push(tag.clone());
                }
            }
            item.tags.retain(|t| !update.remove_tags.contains(t));
            if let Some(review) = update.needs_producer_review {
                item.metadata.insert("needs_producer_review".to_string(), review.into());
            }
        }
        inner.calls.push(WorklogCall::Update { id: id.clone(), update });
        Ok(())
    }

    async fn add_comment(&self, id: &WorkItemId, author: &str, body: &str) -> Result<(), WorklogError> {
        let mut inner = self.inner.lock();
        if let Some(item) = inner.items.iter_mut().find(|w| &w.id == id) {
            item.comments.push(ampa_core::Comment {
                author: author.to_string(),
                body: body.to_string(),
                created_at: chrono::Utc::now(),
            });
        }
        inner
            .calls
            .push(WorklogCall::Comment { id: id.clone(), author: author.to_string(), body: body.to_string() });
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
