// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! Assembles a single [`Config`] value from env vars and CLI flags at
//! startup (spec §9 "module-level env-var reading"). Nothing downstream
//! of `main` reads `std::env` directly.

use crate::exit_error::ExitError;
use ampa_adapters::NotifierCredential;
use ampa_daemon::DaemonPaths;
use ampa_workflow::WorkflowDescriptor;
use std::path::PathBuf;
use std::sync::Arc;

/// The set of env vars recognized by `ampad` (spec §6, plus the
/// supplemental ones SPEC_FULL.md adds).
#[derive(Debug, Clone)]
pub struct Config {
    pub project_root: PathBuf,
    pub name: String,
    pub paths: DaemonPaths,
    pub descriptor: Arc<WorkflowDescriptor>,
    pub worklog_bin: PathBuf,
    pub notifier_credential: Option<NotifierCredential>,
    pub notify_channel: String,
    pub github_repo: Option<String>,
    pub verify_pr_with_gh_env: Option<bool>,
    pub run_scheduler: bool,
    pub delegation_assignee: String,
    pub log_directive: String,
    pub tick_interval: std::time::Duration,
    pub shutdown_grace: std::time::Duration,
}

impl Config {
    /// Assemble `Config`, loading and validating the workflow descriptor
    /// in the process (spec §4.3: even read-only commands validate it at
    /// startup). Fails with exit code 2 if the descriptor can't be read
    /// or parsed, exit code 1 if it parses but fails validation.
    pub fn assemble(name: String, store_path_override: Option<PathBuf>) -> Result<Self, ExitError> {
        let project_root = env_path("AMPA_PROJECT_ROOT")
            .or_else(|| std::env::current_dir().ok())
            .ok_or_else(|| ExitError::new(2, "could not determine project root"))?;

        let descriptor = ampa_workflow::load_from_dir(&project_root)
            .map_err(|e| ExitError::new(2, format!("failed to load workflow descriptor: {e}")))?;
        let report = ampa_workflow::validate(&descriptor);
        if report.has_errors() {
            let detail = report
                .errors()
                .map(|f| format!("{} {}", f.code, f.message))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ExitError::new(1, format!("workflow descriptor failed validation: {detail}")));
        }

        let store_path_override = store_path_override.or_else(|| env_path("AMPA_SCHEDULER_STORE"));
        let paths = DaemonPaths::new(project_root.clone(), name.clone(), store_path_override);

        let webhook = env_string("AMPA_DISCORD_WEBHOOK");
        let bot_token = env_string("AMPA_DISCORD_BOT_TOKEN");

        Ok(Self {
            project_root,
            name,
            paths,
            descriptor: Arc::new(descriptor),
            worklog_bin: env_path("AMPA_WORKLOG_BIN").unwrap_or_else(|| PathBuf::from("wl")),
            notifier_credential: NotifierCredential::from_env_values(webhook, bot_token),
            notify_channel: env_string("AMPA_NOTIFY_CHANNEL").unwrap_or_else(|| "general".to_string()),
            github_repo: env_string("AMPA_GITHUB_REPO"),
            verify_pr_with_gh_env: env_bool("AMPA_VERIFY_PR_WITH_GH"),
            run_scheduler: env_bool("AMPA_RUN_SCHEDULER").unwrap_or(true),
            delegation_assignee: env_string("AMPA_DELEGATION_ASSIGNEE")
                .unwrap_or_else(|| "Patch".to_string()),
            log_directive: env_string("AMPA_LOG_LEVEL")
                .or_else(|| env_string("RUST_LOG"))
                .unwrap_or_else(|| "info".to_string()),
            tick_interval: env_millis("AMPA_TICK_INTERVAL_MS")
                .unwrap_or(ampa_engine::scheduler::DEFAULT_TICK),
            shutdown_grace: env_secs("AMPA_SHUTDOWN_GRACE_SECS")
                .unwrap_or(ampa_engine::scheduler::SHUTDOWN_GRACE),
        })
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_path(key: &str) -> Option<PathBuf> {
    env_string(key).map(PathBuf::from)
}

/// Parses `1|true|yes` (case-insensitive) as truthy, `0|false|no` as
/// falsy; any other value (or an unset var) yields `None` so callers can
/// apply their own default.
fn env_bool(key: &str) -> Option<bool> {
    let raw = env_string(key)?;
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

fn env_millis(key: &str) -> Option<std::time::Duration> {
    env_string(key)?.parse::<u64>().ok().map(std::time::Duration::from_millis)
}

fn env_secs(key: &str) -> Option<std::time::Duration> {
    env_string(key)?.parse::<u64>().ok().map(std::time::Duration::from_secs)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
