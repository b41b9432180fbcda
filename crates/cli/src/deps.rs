// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! Builds the real `SchedulerDeps` (spec §6 adapters) from an assembled
//! [`crate::config::Config`]. The only place in `ampa-cli` that chooses
//! between a real and a fake adapter.

use crate::config::Config;
use crate::exit_error::ExitError;
use ampa_adapters::{NullNotifier, ProcessAgentRunner, ProcessGithubCli, ProcessWorklog, WebhookNotifier};
use ampa_core::SystemClock;
use ampa_engine::audit::AuditRunnerConfig;
use ampa_engine::delegation::DelegationConfig;
use ampa_engine::SchedulerDeps;
use ampa_store::SchedulerStore;
use std::sync::Arc;

pub fn build(config: &Config) -> Result<SchedulerDeps<SystemClock>, ExitError> {
    let store = SchedulerStore::load(&config.paths.store_path)
        .map_err(|e| ExitError::new(1, format!("failed to load scheduler store: {e}")))?;

    let worklog = ProcessWorklog::new(config.worklog_bin.clone(), config.project_root.clone());
    let agent_runner = ProcessAgentRunner::new(config.project_root.clone());
    let notifier: Arc<dyn ampa_adapters::Notifier> = match &config.notifier_credential {
        Some(credential) => Arc::new(WebhookNotifier::new(credential.clone())),
        None => Arc::new(NullNotifier),
    };

    Ok(SchedulerDeps {
        store: Arc::new(store),
        worklog: Arc::new(worklog),
        agent_runner: Arc::new(agent_runner),
        notifier,
        github: Arc::new(ProcessGithubCli),
        descriptor: config.descriptor.clone(),
        clock: SystemClock,
        audit_config: AuditRunnerConfig {
            notify_channel: config.notify_channel.clone(),
            github_repo: config.github_repo.clone(),
            verify_pr_with_gh_env: config.verify_pr_with_gh_env,
        },
        delegation_config: DelegationConfig {
            notify_channel: config.notify_channel.clone(),
            assignee: config.delegation_assignee.clone(),
        },
    })
}
