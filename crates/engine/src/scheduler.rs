// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! The scheduler loop (spec §4.2): a single-threaded cooperative
//! dispatcher with a fixed tick, routing eligible `ScheduledCommand`s to
//! the built-in audit/delegation handlers or to a bare agent-runner
//! invocation for `custom` commands.

use crate::{audit, delegation};
use ampa_adapters::{AgentRunner, GithubCli, Notifier, Worklog};
use ampa_core::{Clock, CommandRun, CommandType, RunId, ScheduledCommand};
use ampa_store::SchedulerStore;
use ampa_workflow::WorkflowDescriptor;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

/// Default tick period (spec §4.2).
pub const DEFAULT_TICK: std::time::Duration = std::time::Duration::from_secs(15);

/// Default grace window given to an in-flight handler on shutdown
/// (spec §4.2, §5).
pub const SHUTDOWN_GRACE: std::time::Duration = std::time::Duration::from_secs(30);

/// Everything one tick (or a CLI `run <command_id>`) needs to dispatch a
/// handler. Adapters are `Arc`-wrapped so a handler invocation can be
/// moved onto a dedicated task for panic containment (spec §4.2 step 6)
/// without forcing the whole scheduler loop onto that task.
#[derive(Clone)]
pub struct SchedulerDeps<C: Clock> {
    pub store: Arc<SchedulerStore>,
    pub worklog: Arc<dyn Worklog>,
    pub agent_runner: Arc<dyn AgentRunner>,
    pub notifier: Arc<dyn Notifier>,
    pub github: Arc<dyn GithubCli>,
    pub descriptor: Arc<WorkflowDescriptor>,
    pub clock: C,
    pub audit_config: audit::AuditRunnerConfig,
    pub delegation_config: delegation::DelegationConfig,
}

/// Outcome of a single tick, mostly useful for tests and the `run` CLI
/// command's exit code.
#[derive(Debug, Clone)]
pub struct TickOutcome {
    pub dispatched: Option<String>,
    pub exit_code: Option<i32>,
}

impl TickOutcome {
    fn idle() -> Self {
        Self { dispatched: None, exit_code: None }
    }
}

/// Commands eligible to run right now: not in flight, and either
/// past their interval since `last_run_at`.
fn eligible_commands<C: Clock>(deps: &SchedulerDeps<C>) -> Vec<ScheduledCommand> {
    let now = deps.clock.now_utc();
    let mut eligible: Vec<ScheduledCommand> = deps
        .store
        .commands()
        .into_iter()
        .filter(|c| {
            if deps.store.is_in_flight(c.command_id.as_str()) {
                return false;
            }
            let interval = chrono::Duration::from_std(c.interval).unwrap_or(chrono::Duration::zero());
            let last_run = deps.store.last_run_at(c.command_id.as_str());
            match last_run {
                Some(last) => now - last >= interval,
                None => true,
            }
        })
        .collect();
    eligible.sort_by_key(|c| c.command_type.dispatch_priority());
    eligible
}

/// Runs one scheduler tick (spec §4.2 steps 1-6): at most one command is
/// started, in descending priority order.
pub async fn tick<C: Clock + 'static>(deps: &SchedulerDeps<C>) -> TickOutcome {
    let Some(command) = eligible_commands(deps).into_iter().next() else {
        return TickOutcome::idle();
    };
    dispatch(deps, &command, /* advance_last_run = */ true).await
}

/// Force-runs `command_id` once, bypassing cooldown but still honoring
/// the `in_flight` exclusion, and without advancing `last_run_at`
/// (spec §4.2, `run <command_id>` CLI semantics).
pub async fn run_once<C: Clock + 'static>(deps: &SchedulerDeps<C>, command_id: &str) -> Option<TickOutcome> {
    let command = deps.store.commands().into_iter().find(|c| c.command_id.as_str() == command_id)?;
    if deps.store.is_in_flight(command_id) {
        warn!(command_id, "run requested but command is already in flight");
        return Some(TickOutcome { dispatched: None, exit_code: Some(1) });
    }
    Some(dispatch(deps, &command, /* advance_last_run = */ false).await)
}

async fn dispatch<C: Clock + 'static>(
    deps: &SchedulerDeps<C>,
    command: &ScheduledCommand,
    advance_last_run: bool,
) -> TickOutcome {
    let command_id = command.command_id.as_str().to_string();
    let pid = std::process::id();
    let now = deps.clock.now_utc();
    if let Err(e) = deps.store.claim_in_flight(&command_id, pid, now) {
        warn!(%command_id, error = %e, "failed to claim in-flight slot, skipping this tick");
        return TickOutcome::idle();
    }

    if advance_last_run {
        deps.store.set_last_run_at(&command_id, now);
    }
    if let Err(e) = deps.store.save() {
        warn!(%command_id, error = %e, "failed to persist last_run_at before handler dispatch");
    }

    info!(%command_id, command_type = ?command.command_type, "dispatching scheduled command");
    let run = execute_handler(deps, command, now).await;
    let exit_code = run.exit_code;

    deps.store.record_run(&command_id, run);
    deps.store.release_in_flight(&command_id);
    if let Err(e) = deps.store.save() {
        warn!(%command_id, error = %e, "failed to persist run record and release");
    }

    TickOutcome { dispatched: Some(command_id), exit_code }
}

/// Runs the handler for `command` on a dedicated task so a panic inside
/// it is caught and recorded rather than taking down the scheduler
/// (spec §4.2 step 6).
async fn execute_handler<C: Clock + 'static>(
    deps: &SchedulerDeps<C>,
    command: &ScheduledCommand,
    started_at: chrono::DateTime<Utc>,
) -> CommandRun {
    let command = command.clone();
    let command_id = command.command_id.as_str().to_string();
    let worklog = deps.worklog.clone();
    let agent_runner = deps.agent_runner.clone();
    let notifier = deps.notifier.clone();
    let github = deps.github.clone();
    let descriptor = deps.descriptor.clone();
    let audit_config = deps.audit_config.clone();
    let delegation_config = deps.delegation_config.clone();
    let store = deps.store.clone();
    let clock = deps.clock.clone();
    let finish_clock = deps.clock.clone();

    let handle = tokio::spawn(async move {
        run_handler(
            &*worklog,
            &*agent_runner,
            &*notifier,
            &*github,
            &descriptor,
            &store,
            &clock,
            &command,
            &audit_config,
            &delegation_config,
        )
        .await
    });

    match handle.await {
        Ok((exit_code, excerpt, note)) => CommandRun {
            id: RunId::new(),
            command_id,
            started_at,
            finished_at: Some(finish_clock.now_utc()),
            exit_code: Some(exit_code),
            stdout_excerpt: excerpt,
            stderr_excerpt: String::new(),
            note,
        },
        Err(join_err) => {
            let is_panic = join_err.is_panic();
            let message =
                if is_panic { panic_message(join_err) } else { "handler task was cancelled".to_string() };
            warn!(%command_id, %message, "scheduled command handler failed");
            CommandRun {
                id: RunId::new(),
                command_id,
                started_at,
                finished_at: Some(finish_clock.now_utc()),
                exit_code: Some(1),
                stdout_excerpt: String::new(),
                stderr_excerpt: message.clone(),
                note: Some(message),
            }
        }
    }
}

fn panic_message(join_err: tokio::task::JoinError) -> String {
    join_err
        .try_into_panic()
        .ok()
        .and_then(|payload| {
            payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
        })
        .unwrap_or_else(|| "handler panicked".to_string())
}

#[allow(clippy::too_many_arguments)]
async fn run_handler<C: Clock>(
    worklog: &dyn Worklog,
    agent_runner: &dyn AgentRunner,
    notifier: &dyn Notifier,
    github: &dyn GithubCli,
    descriptor: &WorkflowDescriptor,
    store: &SchedulerStore,
    clock: &C,
    command: &ScheduledCommand,
    audit_config: &audit::AuditRunnerConfig,
    delegation_config: &delegation::DelegationConfig,
) -> (i32, String, Option<String>) {
    match command.command_type {
        CommandType::TriageAudit => {
            let cooldown = command.audit_cooldown_hours();
            match audit::select_and_claim(worklog, store, clock, cooldown).await {
                Ok(Some(item)) => {
                    let outcome =
                        audit::run(agent_runner, worklog, notifier, github, &item, command, audit_config).await;
                    (
                        outcome.exit_code.unwrap_or(0),
                        format!("audited {} (auto_completed={})", item.id, outcome.auto_completed),
                        None,
                    )
                }
                Ok(None) => (0, "no audit candidates".to_string(), None),
                Err(e) => (1, String::new(), Some(format!("failed to select audit candidate: {e}"))),
            }
        }
        CommandType::Delegation => {
            let outcome = delegation::run(
                worklog,
                agent_runner,
                notifier,
                descriptor,
                command,
                delegation_config,
                clock,
            )
            .await;
            let note = match &outcome {
                delegation::DelegationOutcome::Delegated { item_id, action } => {
                    format!("delegated {item_id} as {action}")
                }
                delegation::DelegationOutcome::IdleConcurrent => "idle: concurrency gate held".to_string(),
                delegation::DelegationOutcome::IdleNoCandidates => "idle: no candidates".to_string(),
                delegation::DelegationOutcome::IdleAllRejected(r) => format!("idle: {} rejected", r.len()),
            };
            (0, note, None)
        }
        CommandType::Custom => {
            let argv = ampa_adapters::render_invocation(&command.invocation, "");
            match agent_runner.run(&argv).await {
                Ok(out) => (out.exit_code.unwrap_or(0), out.combined, None),
                Err(e) => (1, String::new(), Some(format!("custom command failed to spawn: {e}"))),
            }
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
