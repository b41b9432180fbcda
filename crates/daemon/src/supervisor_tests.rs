// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

use super::*;
use ampa_adapters::{FakeAgentRunner, FakeGithubCli, FakeNotifier, FakeWorklog};
use ampa_core::scheduled_command::CommandId;
use ampa_core::{CommandType, FakeClock, ScheduledCommand};
use ampa_engine::audit::AuditRunnerConfig;
use ampa_engine::delegation::DelegationConfig;
use ampa_store::SchedulerStore;
use ampa_workflow::descriptor::Metadata;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tempfile::tempdir;

fn empty_descriptor() -> ampa_workflow::WorkflowDescriptor {
    ampa_workflow::WorkflowDescriptor {
        version: "1.0.0".to_string(),
        status: Vec::new(),
        stage: Vec::new(),
        states: IndexMap::new(),
        terminal_states: Vec::new(),
        invariants: Vec::new(),
        commands: IndexMap::new(),
        metadata: Metadata::default(),
        extra: serde_json::Map::new(),
    }
}

fn deps(store: SchedulerStore) -> SchedulerDeps<FakeClock> {
    SchedulerDeps {
        store: Arc::new(store),
        worklog: Arc::new(FakeWorklog::with_items(vec![])),
        agent_runner: Arc::new(FakeAgentRunner::new()),
        notifier: Arc::new(FakeNotifier::new()),
        github: Arc::new(FakeGithubCli::new()),
        descriptor: Arc::new(empty_descriptor()),
        clock: FakeClock::new(),
        audit_config: AuditRunnerConfig::default(),
        delegation_config: DelegationConfig::default(),
    }
}

#[tokio::test]
async fn wait_for_drain_returns_clean_when_nothing_in_flight() {
    let dir = tempdir().unwrap();
    let store = SchedulerStore::load(dir.path().join("store.json")).unwrap();
    let deps = deps(store);

    let outcome = wait_for_drain(&deps, StdDuration::from_millis(500)).await;
    assert_eq!(outcome, SupervisorOutcome::CleanShutdown);
}

#[tokio::test]
async fn wait_for_drain_forces_shutdown_once_grace_elapses() {
    let dir = tempdir().unwrap();
    let store = SchedulerStore::load(dir.path().join("store.json")).unwrap();
    store.set_commands(vec![ScheduledCommand {
        command_id: CommandId::new("stuck"),
        command_type: CommandType::Custom,
        interval: StdDuration::from_secs(900),
        invocation: vec!["true".to_string()],
        metadata: HashMap::new(),
    }]);
    store.claim_in_flight("stuck", std::process::id(), chrono::Utc::now()).unwrap();
    let deps = deps(store);

    let started = tokio::time::Instant::now();
    let outcome = wait_for_drain(&deps, StdDuration::from_millis(200)).await;
    assert_eq!(outcome, SupervisorOutcome::ForcedShutdown);
    assert!(started.elapsed() >= StdDuration::from_millis(200));
}

#[test]
fn maybe_compact_history_runs_only_on_the_nth_tick() {
    let dir = tempdir().unwrap();
    let store = SchedulerStore::load(dir.path().join("store.json")).unwrap();
    store.record_run("ghost", ampa_core::CommandRun {
        id: ampa_core::RunId::new(),
        command_id: "ghost".to_string(),
        started_at: chrono::Utc::now(),
        finished_at: None,
        exit_code: None,
        stdout_excerpt: String::new(),
        stderr_excerpt: String::new(),
        note: None,
    });
    let deps = deps(store);

    for tick in 1..COMPACT_EVERY_N_TICKS {
        maybe_compact_history(&deps, tick);
        assert!(!deps.store.history("ghost").is_empty(), "compaction ran early at tick {tick}");
    }
    maybe_compact_history(&deps, COMPACT_EVERY_N_TICKS);
    assert!(deps.store.history("ghost").is_empty());
}

#[tokio::test]
async fn run_supervisor_in_idle_mode_writes_and_removes_the_pid_file_once_signaled() {
    let dir = tempdir().unwrap();
    let store = SchedulerStore::load(dir.path().join("store.json")).unwrap();
    let paths = DaemonPaths::new(dir.path(), "default", None);
    let deps = deps(store);
    let config = SupervisorConfig { tick_interval: StdDuration::from_millis(10), shutdown_grace: StdDuration::from_millis(50) };

    let pid_path = paths.pid_path.clone();
    let descriptor_handle = DescriptorHandle::new(deps.descriptor.clone());
    let handle = tokio::spawn(async move { run_supervisor(deps, descriptor_handle, &paths, &config, false).await });

    // Give the supervisor a moment to write its pid file before we
    // signal shutdown via ctrl_c (SIGINT is the only signal a unit
    // test can plausibly raise against its own process).
    tokio::time::sleep(StdDuration::from_millis(50)).await;
    assert!(pid_path.exists());

    // SAFETY-free: raise via nix rather than an unsafe libc call.
    crate::pid::signal(std::process::id(), nix::sys::signal::Signal::SIGINT).unwrap();

    let outcome = tokio::time::timeout(StdDuration::from_secs(2), handle).await.unwrap().unwrap().unwrap();
    assert_eq!(outcome, SupervisorOutcome::CleanShutdown);
    assert!(!pid_path.exists());
}
