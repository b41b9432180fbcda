// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! Real `Worklog` implementation: shells out to the configured worklog
//! CLI binary and parses its `--json` output (spec §6).

use crate::worklog::{normalize_list_response, WorkItemUpdate, Worklog, WorklogError};
use ampa_core::{WorkItem, WorkItemId};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;

/// Spawns the worklog CLI as a subprocess for every operation. The
/// binary name and working directory are fixed at construction; each
/// call builds one `Command` invocation.
#[derive(Debug, Clone)]
pub struct ProcessWorklog {
    binary: PathBuf,
    project_root: PathBuf,
}

impl ProcessWorklog {
    pub fn new(binary: impl Into<PathBuf>, project_root: impl Into<PathBuf>) -> Self {
        Self { binary: binary.into(), project_root: project_root.into() }
    }

    async fn run(&self, args: &[&str]) -> Result<serde_json::Value, WorklogError> {
        debug!(binary = %self.binary.display(), ?args, "invoking worklog CLI");
        let output = Command::new(&self.binary)
            .args(args)
            .current_dir(&self.project_root)
            .output()
            .await
            .map_err(WorklogError::Spawn)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            return Err(WorklogError::NonZeroExit {
                code: output.status.code().unwrap_or(-1),
                stderr,
            });
        }

        serde_json::from_slice(&output.stdout).map_err(|e| WorklogError::Parse(e.to_string()))
    }
}

#[async_trait]
impl Worklog for ProcessWorklog {
    async fn show(&self, id: &WorkItemId) -> Result<WorkItem, WorklogError> {
        let value = self.run(&["show", id.as_str(), "--json"]).await?;
        serde_json::from_value(value).map_err(|e| WorklogError::Parse(e.to_string()))
    }

    async fn list_by_stage(&self, stage: &str) -> Result<Vec<WorkItem>, WorklogError> {
        let value = self.run(&["list", "--stage", stage, "--json"]).await?;
        normalize_list_response(value)
    }

    async fn list_in_progress(&self) -> Result<Vec<WorkItem>, WorklogError> {
        let value = self.run(&["in_progress", "--json"]).await?;
        normalize_list_response(value)
    }

    async fn next(&self, n: usize) -> Result<Vec<WorkItem>, WorklogError> {
        let n_str = n.to_string();
        let value = self.run(&["next", "-n", &n_str, "--json"]).await?;
        normalize_list_response(value)
    }

    async fn update(&self, id: &WorkItemId, update: WorkItemUpdate) -> Result<(), WorklogError> {
        let mut args: Vec<String> = vec!["update".to_string(), id.as_str().to_string()];
        if let Some(status) = &update.status {
            args.push("--status".to_string());
            args.push(status.as_str().to_string());
        }
        if let Some(stage) = &update.stage {
            args.push("--stage".to_string());
            args.push(stage.as_str().to_string());
        }
        if let Some(assignee) = &update.assignee {
            args.push("--assignee".to_string());
            args.push(assignee.clone());
        }
        if let Some(review) = update.needs_producer_review {
            args.push("--needs-producer-review".to_string());
            args.push(review.to_string());
        }
        for tag in &update.add_tags {
            args.push("--add-tag".to_string());
            args.push(tag.clone());
        }
        for tag in &update.remove_tags {
            args.push("--remove-tag".to_string());
            args.push(tag.clone());
        }
        args.push("--json".to_string());
        let refs: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run(&refs).await?;
        Ok(())
    }

    async fn add_comment(&self, id: &WorkItemId, author: &str, body: &str) -> Result<(), WorklogError> {
        self.run(&["comment", "add", id.as_str(), "--comment", body, "--author", author, "--json"])
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
