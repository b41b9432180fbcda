// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! The `GithubCli` capability: PR-merge verification via the `gh` CLI
//! (spec §4.6 step 5c). Narrow on purpose — the only thing the audit
//! runner needs to know is "has this PR merged".

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum GithubCliError {
    #[error("failed to spawn gh: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("gh exited with status {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },
}

#[async_trait]
pub trait GithubCli: Send + Sync + 'static {
    /// Whether the PR at `url` is merged. Spec §9 open question: absence
    /// of `gh` (a spawn failure) is treated as "unverified" — callers
    /// must not auto-complete on `Err`, only on `Ok(true)`.
    async fn is_pr_merged(&self, url: &str) -> Result<bool, GithubCliError>;
}

#[derive(Debug, Clone, Default)]
pub struct ProcessGithubCli;

#[async_trait]
impl GithubCli for ProcessGithubCli {
    async fn is_pr_merged(&self, url: &str) -> Result<bool, GithubCliError> {
        debug!(%url, "checking PR merge state via gh");
        let output = Command::new("gh")
            .args(["pr", "view", url, "--json", "state", "-q", ".state"])
            .output()
            .await
            .map_err(GithubCliError::Spawn)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            warn!(%url, %stderr, "gh pr view failed");
            return Err(GithubCliError::NonZeroExit {
                code: output.status.code().unwrap_or(-1),
                stderr,
            });
        }

        let state = String::from_utf8_lossy(&output.stdout).trim().to_uppercase();
        Ok(state == "MERGED")
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[derive(Debug, Clone, Default)]
    pub struct FakeGithubCli {
        merged: Arc<Mutex<HashMap<String, bool>>>,
    }

    impl FakeGithubCli {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_merged(&self, url: impl Into<String>, merged: bool) {
            self.merged.lock().insert(url.into(), merged);
        }
    }

    #[async_trait]
    impl GithubCli for FakeGithubCli {
        async fn is_pr_merged(&self, url: &str) -> Result<bool, GithubCliError> {
            Ok(self.merged.lock().get(url).copied().unwrap_or(false))
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeGithubCli;

#[cfg(test)]
#[path = "github_tests.rs"]
mod tests;
