// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! The daemon supervisor: owns the pid file across the process's
//! lifetime, clears stale in-flight claims left by a crashed prior run
//! (spec §4.2, §8 T-6), and drives `ampa_engine::scheduler::tick` on a
//! fixed cadence until a shutdown signal arrives (spec §4.2, §5).

use crate::pid::{is_owned_process, is_process_alive, PidFile};
use crate::paths::DaemonPaths;
use ampa_core::Clock;
use ampa_engine::scheduler;
use ampa_engine::SchedulerDeps;
use ampa_workflow::WorkflowDescriptor;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// History compaction runs every this-many ticks (SPEC_FULL.md
/// supplemental, not separately configurable), trimming history entries
/// orphaned by a `ScheduledCommand` removed from the store.
const COMPACT_EVERY_N_TICKS: u64 = 100;

/// Shared handle to the currently-active descriptor, swapped in place by
/// SIGHUP (spec §3 "optional" hot-reload). Cheap to clone: callers read
/// through a single `Arc` snapshot per access rather than holding the
/// lock across a tick.
#[derive(Clone)]
pub struct DescriptorHandle(Arc<RwLock<Arc<WorkflowDescriptor>>>);

impl DescriptorHandle {
    pub fn new(descriptor: Arc<WorkflowDescriptor>) -> Self {
        Self(Arc::new(RwLock::new(descriptor)))
    }

    pub fn current(&self) -> Arc<WorkflowDescriptor> {
        self.0.read().clone()
    }

    /// Reload from `project_root`, keeping the prior descriptor in place
    /// if the candidate fails validation (spec §4.3: a reload never
    /// installs a partially-valid descriptor).
    fn reload(&self, project_root: &std::path::Path) {
        let loaded = match ampa_workflow::load_from_dir(project_root) {
            Ok(d) => d,
            Err(e) => {
                error!(error = %e, "workflow descriptor reload failed, keeping prior descriptor");
                return;
            }
        };
        let report = ampa_workflow::validate(&loaded);
        if report.has_errors() {
            error!(?report, "reloaded workflow descriptor failed validation, keeping prior descriptor");
            return;
        }
        info!(version = %loaded.version, "workflow descriptor reloaded");
        *self.0.write() = Arc::new(loaded);
    }
}

/// Tunables threaded explicitly rather than hardcoded (spec §9: "do not
/// re-read env at call sites"; SPEC_FULL.md: tests run the loop with a
/// millisecond tick).
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    pub tick_interval: Duration,
    pub shutdown_grace: Duration,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self { tick_interval: scheduler::DEFAULT_TICK, shutdown_grace: scheduler::SHUTDOWN_GRACE }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorOutcome {
    /// All in-flight handlers drained before the grace window elapsed.
    CleanShutdown,
    /// The grace window elapsed with a handler still in flight.
    ForcedShutdown,
}

/// Runs the supervisor loop in the foreground. Callers own backgrounding
/// (spawning a detached child and returning) — this function always
/// blocks until a shutdown signal is received.
///
/// `run_scheduler` corresponds to `AMPA_RUN_SCHEDULER` (spec §6): when
/// false the daemon still owns its pid file and answers signals, but
/// never dispatches a tick — an idle maintenance mode for operators who
/// want `status`/`list` to see a live daemon without it acting on the
/// backlog.
pub async fn run_supervisor<C: Clock + 'static>(
    deps: SchedulerDeps<C>,
    descriptor_handle: DescriptorHandle,
    paths: &DaemonPaths,
    config: &SupervisorConfig,
    run_scheduler: bool,
) -> std::io::Result<SupervisorOutcome> {
    let tokens = paths.ownership_tokens();
    deps.store.clear_stale_in_flight(|pid| is_process_alive(pid) && is_owned_process(pid, &tokens));
    if let Err(e) = deps.store.save() {
        warn!(error = %e, "failed to persist store after clearing stale in-flight claims");
    }

    paths.ensure_dirs()?;
    let pid_file = PidFile::new(&paths.pid_path);
    pid_file.write(std::process::id()).map_err(std::io::Error::other)?;
    deps.store.set_last_global_start_ts(chrono::Utc::now());
    if let Err(e) = deps.store.save() {
        warn!(error = %e, "failed to persist start timestamp");
    }
    info!(pid = std::process::id(), name = %paths.name, "daemon supervisor started");

    let outcome = run_loop(&deps, &descriptor_handle, &paths.project_root, config, run_scheduler).await;

    if let Err(e) = pid_file.remove() {
        warn!(error = %e, "failed to remove pid file on shutdown");
    }
    info!(?outcome, "daemon supervisor stopped");
    Ok(outcome)
}

async fn run_loop<C: Clock + 'static>(
    deps: &SchedulerDeps<C>,
    descriptor_handle: &DescriptorHandle,
    project_root: &std::path::Path,
    config: &SupervisorConfig,
    run_scheduler: bool,
) -> SupervisorOutcome {
    let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            warn!(error = %e, "failed to install SIGTERM handler, shutdown will rely on SIGINT only");
            return run_loop_no_term(deps, descriptor_handle, project_root, config, run_scheduler).await;
        }
    };
    let mut sighup = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::hangup()) {
        Ok(s) => Some(s),
        Err(e) => {
            warn!(error = %e, "failed to install SIGHUP handler, descriptor hot-reload is unavailable");
            None
        }
    };

    let mut tick_count: u64 = 0;
    loop {
        tokio::select! {
            biased;
            _ = sigterm.recv() => {
                info!("SIGTERM received, beginning graceful shutdown");
                break;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("SIGINT received, beginning graceful shutdown");
                break;
            }
            _ = recv_optional(sighup.as_mut()) => {
                info!("SIGHUP received, reloading workflow descriptor");
                descriptor_handle.reload(project_root);
            }
            _ = tokio::time::sleep(config.tick_interval), if run_scheduler => {
                let tick_deps = SchedulerDeps { descriptor: descriptor_handle.current(), ..deps.clone() };
                let outcome = scheduler::tick(&tick_deps).await;
                if let Some(command_id) = outcome.dispatched {
                    info!(%command_id, exit_code = ?outcome.exit_code, "tick dispatched a command");
                }
                tick_count += 1;
                maybe_compact_history(deps, tick_count);
            }
            _ = std::future::pending::<()>(), if !run_scheduler => {}
        }
    }

    wait_for_drain(deps, config.shutdown_grace).await
}

/// Awaits the next signal on `sighup` when a handler was installed,
/// otherwise never resolves. Lets the `select!` arm race the optional
/// SIGHUP stream without asserting it's present via `.unwrap()`.
async fn recv_optional(sighup: Option<&mut tokio::signal::unix::Signal>) {
    match sighup {
        Some(s) => {
            s.recv().await;
        }
        None => std::future::pending().await,
    }
}

/// Compacts the store's `history` map every [`COMPACT_EVERY_N_TICKS`]
/// ticks, independent of whether this tick dispatched anything.
fn maybe_compact_history<C: Clock>(deps: &SchedulerDeps<C>, tick_count: u64) {
    if tick_count % COMPACT_EVERY_N_TICKS != 0 {
        return;
    }
    deps.store.compact_history();
    if let Err(e) = deps.store.save() {
        warn!(error = %e, "failed to persist store after history compaction");
    }
}

/// Fallback loop when the SIGTERM handler couldn't be installed
/// (platform oddity); SIGINT and the tick race as before.
async fn run_loop_no_term<C: Clock + 'static>(
    deps: &SchedulerDeps<C>,
    descriptor_handle: &DescriptorHandle,
    project_root: &std::path::Path,
    config: &SupervisorConfig,
    run_scheduler: bool,
) -> SupervisorOutcome {
    let mut sighup = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::hangup()) {
        Ok(s) => Some(s),
        Err(_) => None,
    };
    let mut tick_count: u64 = 0;
    loop {
        tokio::select! {
            biased;
            _ = tokio::signal::ctrl_c() => {
                info!("SIGINT received, beginning graceful shutdown");
                break;
            }
            _ = recv_optional(sighup.as_mut()) => {
                descriptor_handle.reload(project_root);
            }
            _ = tokio::time::sleep(config.tick_interval), if run_scheduler => {
                let tick_deps = SchedulerDeps { descriptor: descriptor_handle.current(), ..deps.clone() };
                scheduler::tick(&tick_deps).await;
                tick_count += 1;
                maybe_compact_history(deps, tick_count);
            }
            _ = std::future::pending::<()>(), if !run_scheduler => {}
        }
    }
    wait_for_drain(deps, config.shutdown_grace).await
}

/// Polls the store for any remaining in-flight claim for up to `grace`,
/// then returns regardless (spec §4.2: "after that the daemon exits
/// regardless").
async fn wait_for_drain<C: Clock + 'static>(deps: &SchedulerDeps<C>, grace: Duration) -> SupervisorOutcome {
    let deadline = tokio::time::Instant::now() + grace;
    loop {
        let still_in_flight = deps.store.commands().iter().any(|c| deps.store.is_in_flight(c.command_id.as_str()));
        if !still_in_flight {
            return SupervisorOutcome::CleanShutdown;
        }
        if tokio::time::Instant::now() >= deadline {
            warn!("shutdown grace window elapsed with a handler still in flight");
            return SupervisorOutcome::ForcedShutdown;
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
