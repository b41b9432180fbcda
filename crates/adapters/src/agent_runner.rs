// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! The `AgentRunner` capability: spawns the external AI-agent CLI and
//! the worklog CLI-invoking agent commands as black-box subprocesses
//! (spec §6). The core only ever sees captured stdout+stderr and an
//! exit code — it never interprets agent reasoning.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Error)]
pub enum AgentRunnerError {
    #[error("failed to spawn agent runner {argv0:?}: {source}")]
    Spawn {
        argv0: String,
        #[source]
        source: std::io::Error,
    },
}

/// Captured output of one agent-runner invocation.
#[derive(Debug, Clone, Default)]
pub struct AgentRunOutput {
    pub combined: String,
    pub exit_code: Option<i32>,
}

/// Substitutes the single `{id}` placeholder spec §6 documents for an
/// argv template (e.g. `["opencode", "run", "/audit {id}"]`).
pub fn render_invocation(template: &[String], id: &str) -> Vec<String> {
    render_invocation_with(template, &[("{id}", id)])
}

/// Substitutes an arbitrary set of `{placeholder}` tokens in an argv
/// template. Supplemental generalization of [`render_invocation`] for
/// the delegation engine, whose invocation templates also carry an
/// `{action}` placeholder (spec §4.7's `intake`/`plan`/`implement`).
pub fn render_invocation_with(template: &[String], replacements: &[(&str, &str)]) -> Vec<String> {
    template
        .iter()
        .map(|arg| {
            replacements.iter().fold(arg.clone(), |acc, (placeholder, value)| acc.replace(placeholder, value))
        })
        .collect()
}

#[async_trait]
pub trait AgentRunner: Send + Sync + 'static {
    /// Spawn `argv`, wait for completion, and return the captured
    /// stdout+stderr (interleaved in completion order is not guaranteed;
    /// spec only requires "capture stdout+stderr into one string") plus
    /// the exit code.
    async fn run(&self, argv: &[String]) -> Result<AgentRunOutput, AgentRunnerError>;

    /// Fire-and-forget dispatch for the delegation engine (spec §4.7):
    /// the engine never blocks the scheduler tick on agent completion.
    /// Default implementation spawns `run` on a detached task and logs
    /// the outcome; real adapters may override for process-group detach.
    fn spawn_detached(&self, argv: Vec<String>)
    where
        Self: Sized + Clone,
    {
        let this = self.clone();
        tokio::spawn(async move {
            match this.run(&argv).await {
                Ok(out) => debug!(exit_code = ?out.exit_code, "detached agent run finished"),
                Err(e) => tracing::warn!(error = %e, "detached agent run failed to spawn"),
            }
        });
    }
}

/// Spawns the configured binary as a real OS subprocess.
#[derive(Debug, Clone)]
pub struct ProcessAgentRunner {
    project_root: PathBuf,
}

impl ProcessAgentRunner {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self { project_root: project_root.into() }
    }
}

#[async_trait]
impl AgentRunner for ProcessAgentRunner {
    async fn run(&self, argv: &[String]) -> Result<AgentRunOutput, AgentRunnerError> {
        let Some((argv0, rest)) = argv.split_first() else {
            return Ok(AgentRunOutput::default());
        };
        debug!(%argv0, ?rest, "spawning agent runner");
        let output = Command::new(argv0)
            .args(rest)
            .current_dir(&self.project_root)
            .output()
            .await
            .map_err(|source| AgentRunnerError::Spawn { argv0: argv0.clone(), source })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(AgentRunOutput { combined, exit_code: output.status.code() })
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Debug, Clone, Default)]
    pub struct FakeAgentRunner {
        calls: Arc<Mutex<Vec<Vec<String>>>>,
        response: Arc<Mutex<AgentRunOutput>>,
    }

    impl FakeAgentRunner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_response(self, combined: impl Into<String>, exit_code: i32) -> Self {
            *self.response.lock() = AgentRunOutput { combined: combined.into(), exit_code: Some(exit_code) };
            self
        }

        pub fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl AgentRunner for FakeAgentRunner {
        async fn run(&self, argv: &[String]) -> Result<AgentRunOutput, AgentRunnerError> {
            self.calls.lock().push(argv.to_vec());
            Ok(self.response.lock().clone())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeAgentRunner;

#[cfg(test)]
#[path = "agent_runner_tests.rs"]
mod tests;
