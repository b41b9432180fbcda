// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! The work item record retrieved from the worklog CLI.

use crate::stage::Stage;
use crate::status::Status;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stable work item identifier, shape `<prefix>-<hash>` (e.g. `WL-a1b2c3`).
///
/// Unlike the daemon-generated ids in [`crate::id`], work item ids are
/// assigned by the worklog CLI; this is a plain string newtype, not a
/// [`crate::define_id!`] generator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkItemId(pub String);

impl WorkItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WorkItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for WorkItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for WorkItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for WorkItemId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// Issue type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    Feature,
    Bug,
    Chore,
    Task,
    Epic,
}

/// A single comment on a work item, in posting order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Whether this comment's body begins with the AMPA audit result heading.
    pub fn is_audit_result(&self) -> bool {
        self.body.contains("# AMPA Audit Result")
    }
}

/// Opaque record retrieved from the worklog CLI.
///
/// The daemon never constructs this except via worklog CLI deserialization
/// (or, in tests, the `test-support` builder) — it never writes the
/// backing file directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: WorkItemId,
    pub title: String,
    pub description: String,
    pub status: Status,
    pub stage: Stage,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub children: Vec<WorkItemId>,
    #[serde(default, rename = "issueType")]
    pub issue_type: Option<IssueType>,
    #[serde(default)]
    pub github_issue_number: Option<u64>,
    /// Free-form metadata flags (e.g. `do_not_delegate`, `no_delegation`).
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl WorkItem {
    pub fn description_length(&self) -> usize {
        self.description.chars().count()
    }

    /// Lower-cased tag set, for case-insensitive membership checks.
    pub fn tags_lower(&self) -> Vec<String> {
        self.tags.iter().map(|t| t.to_lowercase()).collect()
    }

    /// Most recently posted comment, if any.
    pub fn latest_comment(&self) -> Option<&Comment> {
        self.comments.last()
    }

    /// Most recent comment whose body is an AMPA audit result report.
    pub fn latest_audit_comment(&self) -> Option<&Comment> {
        self.comments.iter().rev().find(|c| c.is_audit_result())
    }

    /// A metadata flag is truthy if present and not `false`/`0`/empty string.
    pub fn metadata_flag(&self, key: &str) -> bool {
        match self.metadata.get(key) {
            Some(serde_json::Value::Bool(b)) => *b,
            Some(serde_json::Value::String(s)) => {
                matches!(s.to_lowercase().as_str(), "1" | "true" | "yes")
            }
            Some(serde_json::Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
            _ => false,
        }
    }

    /// Whether every child (if any) is in a terminal status.
    pub fn children_all_terminal(&self, backlog: &[WorkItem]) -> bool {
        if self.children.is_empty() {
            return true;
        }
        self.children.iter().all(|child_id| {
            backlog
                .iter()
                .find(|w| &w.id == child_id)
                .map(|w| matches!(w.status, Status::Completed | Status::Closed))
                .unwrap_or(false)
        })
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod builder {
    use super::*;

    /// Test builder for [`WorkItem`] with reasonable defaults.
    pub struct WorkItemBuilder {
        item: WorkItem,
    }

    impl Default for WorkItemBuilder {
        fn default() -> Self {
            Self {
                item: WorkItem {
                    id: WorkItemId::new("WL-0000"),
                    title: "untitled".to_string(),
                    description: String::new(),
                    status: Status::Open,
                    stage: Stage::Idea,
                    assignee: None,
                    priority: None,
                    tags: Vec::new(),
                    updated_at: None,
                    comments: Vec::new(),
                    children: Vec::new(),
                    issue_type: None,
                    github_issue_number: None,
                    metadata: HashMap::new(),
                },
            }
        }
    }

    impl WorkItemBuilder {
        pub fn id(mut self, id: impl Into<String>) -> Self {
            self.item.id = WorkItemId::new(id);
            self
        }

        pub fn title(mut self, title: impl Into<String>) -> Self {
            self.item.title = title.into();
            self
        }

        pub fn description(mut self, description: impl Into<String>) -> Self {
            self.item.description = description.into();
            self
        }

        pub fn status(mut self, status: Status) -> Self {
            self.item.status = status;
            self
        }

        pub fn stage(mut self, stage: Stage) -> Self {
            self.item.stage = stage;
            self
        }

        pub fn tags(mut self, tags: Vec<String>) -> Self {
            self.item.tags = tags;
            self
        }

        pub fn updated_at(mut self, at: DateTime<Utc>) -> Self {
            self.item.updated_at = Some(at);
            self
        }

        pub fn comment(mut self, author: impl Into<String>, body: impl Into<String>, at: DateTime<Utc>) -> Self {
            self.item.comments.push(Comment { author: author.into(), body: body.into(), created_at: at });
            self
        }

        pub fn children(mut self, children: Vec<WorkItemId>) -> Self {
            self.item.children = children;
            self
        }

        pub fn build(self) -> WorkItem {
            self.item
        }
    }

    impl WorkItem {
        pub fn builder() -> WorkItemBuilder {
            WorkItemBuilder::default()
        }
    }
}

#[cfg(test)]
#[path = "work_item_tests.rs"]
mod tests;
