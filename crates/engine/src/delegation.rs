// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! The delegation engine (spec §4.7): picks the highest-priority
//! delegation-eligible candidate, admits it against the `delegate`
//! command's `pre[]` invariants, dispatches the matching agent action,
//! and annotates the work item. Tracking lives on the work item itself,
//! never in the store.

use crate::invariant::{self, InvariantContext};
use ampa_adapters::{render_invocation_with, AgentRunner, Notifier, WorkItemUpdate, Worklog};
use ampa_core::{Clock, Notification, NotificationField, ScheduledCommand, Severity, WorkItem};
use ampa_workflow::WorkflowDescriptor;
use tracing::{info, warn};

/// Assignee recorded on a delegated item absent an operator override
/// (spec §4.7 step 5).
pub const DEFAULT_ASSIGNEE: &str = "Patch";

#[derive(Debug, Clone)]
pub struct DelegationConfig {
    pub notify_channel: String,
    pub assignee: String,
}

impl Default for DelegationConfig {
    fn default() -> Self {
        Self { notify_channel: String::new(), assignee: DEFAULT_ASSIGNEE.to_string() }
    }
}

/// Why a candidate was rejected, or why no dispatch happened at all.
#[derive(Debug, Clone)]
pub struct Rejection {
    pub item: WorkItem,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum DelegationOutcome {
    /// A candidate was admitted and dispatched.
    Delegated { item_id: ampa_core::WorkItemId, action: &'static str },
    /// One or more items are already `in_progress`; preflight gate held.
    IdleConcurrent,
    /// `next` returned no delegation-eligible candidates.
    IdleNoCandidates,
    /// Candidates existed but none passed its full `pre[]` set.
    IdleAllRejected(Vec<Rejection>),
}

/// Runs one delegation cycle (spec §4.7 steps 1-6).
#[allow(clippy::too_many_arguments)]
pub async fn run<C: Clock>(
    worklog: &dyn Worklog,
    agent_runner: &dyn AgentRunner,
    notifier: &dyn Notifier,
    descriptor: &WorkflowDescriptor,
    command: &ScheduledCommand,
    config: &DelegationConfig,
    clock: &C,
) -> DelegationOutcome {
    match worklog.list_in_progress().await {
        Ok(in_progress) if !in_progress.is_empty() => {
            notify_idle(notifier, config, format!("{} item(s) already in progress", in_progress.len())).await;
            return DelegationOutcome::IdleConcurrent;
        }
        Ok(_) => {}
        Err(e) => {
            warn!(error = %e, "failed to list in-progress items, treating concurrency gate as held");
            notify_idle(notifier, config, "concurrency check failed".to_string()).await;
            return DelegationOutcome::IdleConcurrent;
        }
    }

    let candidates = match worklog.next(3).await {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "failed to fetch delegation candidates");
            notify_idle(notifier, config, "no candidates (worklog CLI error)".to_string()).await;
            return DelegationOutcome::IdleNoCandidates;
        }
    };
    if candidates.is_empty() {
        notify_idle(notifier, config, "no candidates".to_string()).await;
        return DelegationOutcome::IdleNoCandidates;
    }

    let pre = descriptor.command("delegate").map(|c| c.pre.clone()).unwrap_or_default();
    let mut rejections = Vec::new();

    for candidate in &candidates {
        let ctx = InvariantContext::new(candidate, &candidates);
        let report = invariant::evaluate_all(&pre, &ctx);
        if report.admitted() {
            let Some(action) = candidate.stage.delegation_action() else {
                rejections.push(Rejection {
                    item: candidate.clone(),
                    reasons: vec![format!("stage {:?} has no delegation action", candidate.stage.as_str())],
                });
                continue;
            };
            dispatch(worklog, agent_runner, notifier, candidate, action, command, config, clock).await;
            return DelegationOutcome::Delegated { item_id: candidate.id.clone(), action };
        }
        rejections.push(Rejection {
            item: candidate.clone(),
            reasons: report.failures().map(|f| f.detail.clone()).collect(),
        });
    }

    notify_rejections(notifier, config, &rejections).await;
    DelegationOutcome::IdleAllRejected(rejections)
}

#[allow(clippy::too_many_arguments)]
async fn dispatch<C: Clock>(
    worklog: &dyn Worklog,
    agent_runner: &dyn AgentRunner,
    notifier: &dyn Notifier,
    candidate: &WorkItem,
    action: &'static str,
    command: &ScheduledCommand,
    config: &DelegationConfig,
    clock: &C,
) {
    let argv =
        render_invocation_with(&command.invocation, &[("{id}", candidate.id.as_str()), ("{action}", action)]);

    info!(item_id = %candidate.id, %action, "delegating item");
    match agent_runner.run(&argv).await {
        Ok(out) => info!(item_id = %candidate.id, exit_code = ?out.exit_code, "delegation agent finished"),
        Err(e) => warn!(item_id = %candidate.id, error = %e, "delegation agent failed to spawn"),
    }

    let update = WorkItemUpdate {
        status: Some(ampa_core::Status::InProgress),
        stage: Some(ampa_core::Stage::Delegated),
        assignee: Some(config.assignee.clone()),
        add_tags: vec!["delegated".to_string()],
        ..Default::default()
    };
    if let Err(e) = worklog.update(&candidate.id, update).await {
        warn!(item_id = %candidate.id, error = %e, "failed to record delegation on work item");
    }

    let comment = format!(
        "Delegated via `{}` as `{action}` to {} at {}.",
        command.command_id,
        config.assignee,
        clock.now_utc().to_rfc3339()
    );
    if let Err(e) = worklog.add_comment(&candidate.id, "ampa", &comment).await {
        warn!(item_id = %candidate.id, error = %e, "failed to post delegation comment");
    }

    let notification = Notification::new(
        &config.notify_channel,
        "AMPA Delegation",
        Severity::Info,
    )
    .with_body(format!("Delegating '{action}' for '{}' ({})", candidate.title, candidate.id))
    .with_field(NotificationField::new("Item", candidate.id.as_str(), true))
    .with_field(NotificationField::new("Action", action, true));
    notifier.notify(&notification).await;
}

async fn notify_idle(notifier: &dyn Notifier, config: &DelegationConfig, reason: String) {
    let notification =
        Notification::new(&config.notify_channel, "AMPA Delegation Idle", Severity::Info).with_body(reason);
    notifier.notify(&notification).await;
}

async fn notify_rejections(notifier: &dyn Notifier, config: &DelegationConfig, rejections: &[Rejection]) {
    let mut body = String::from("idle: all candidates rejected\n");
    for r in rejections {
        body.push_str(&format!("- {} ({}): {}\n", r.item.id, r.item.title, r.reasons.join("; ")));
    }
    let notification =
        Notification::new(&config.notify_channel, "AMPA Delegation Idle", Severity::Info).with_body(body);
    notifier.notify(&notification).await;
}

#[cfg(test)]
#[path = "delegation_tests.rs"]
mod tests;
