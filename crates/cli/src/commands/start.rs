// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! `ampad start` (spec §4.8): verify no live owner of the pid file,
//! then either run the supervisor loop in this process (`--foreground`)
//! or background it as a detached child.

use crate::config::Config;
use crate::deps;
use crate::exit_error::ExitError;
use ampa_daemon::{DescriptorHandle, OwnershipCheck, PidFile, SupervisorConfig};
use std::os::unix::process::CommandExt;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

pub async fn run(config: Config, foreground: bool) -> Result<i32, ExitError> {
    let pid_file = PidFile::new(&config.paths.pid_path);
    let tokens = config.paths.ownership_tokens();
    match pid_file.check(&tokens).map_err(|e| ExitError::new(1, format!("failed to check pid file: {e}")))? {
        OwnershipCheck::Owned(pid) => {
            println!("daemon '{}' already running (pid {pid})", config.paths.name);
            return Ok(0);
        }
        OwnershipCheck::Absent => {}
        OwnershipCheck::Stale(pid) => {
            println!("removed stale pid file for dead/unowned pid {pid}");
        }
    }

    if foreground {
        run_foreground(config).await
    } else {
        spawn_background(config)
    }
}

async fn run_foreground(config: Config) -> Result<i32, ExitError> {
    config
        .paths
        .ensure_dirs()
        .map_err(|e| ExitError::new(1, format!("failed to create state directories: {e}")))?;

    let (writer, _guard) = ampa_daemon::init_file_writer(&config.paths.log_path)
        .map_err(|e| ExitError::new(1, format!("failed to open log file: {e}")))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_directive.clone()))
        .with_writer(writer)
        .with_ansi(false)
        .try_init();

    let scheduler_deps = deps::build(&config)?;
    let descriptor_handle = DescriptorHandle::new(config.descriptor.clone());
    let supervisor_config =
        SupervisorConfig { tick_interval: config.tick_interval, shutdown_grace: config.shutdown_grace };

    let outcome = ampa_daemon::run_supervisor(
        scheduler_deps,
        descriptor_handle,
        &config.paths,
        &supervisor_config,
        config.run_scheduler,
    )
    .await
    .map_err(|e| ExitError::new(1, format!("supervisor loop failed: {e}")))?;

    tracing::info!(?outcome, "ampad exiting");
    Ok(0)
}

/// Re-execs the current binary as `start --foreground`, detached into
/// its own session so it survives this process exiting, then waits for
/// the pid file to appear before returning (spec §4.8: "spawn the
/// scheduler loop; write pid file; return").
fn spawn_background(config: Config) -> Result<i32, ExitError> {
    config
        .paths
        .ensure_dirs()
        .map_err(|e| ExitError::new(1, format!("failed to create state directories: {e}")))?;

    let exe = std::env::current_exe().map_err(|e| ExitError::new(1, format!("could not resolve own executable: {e}")))?;
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.paths.log_path)
        .map_err(|e| ExitError::new(1, format!("failed to open log file {}: {e}", config.paths.log_path.display())))?;
    let log_file_err = log_file.try_clone().map_err(|e| ExitError::new(1, format!("failed to duplicate log handle: {e}")))?;

    let mut command = std::process::Command::new(&exe);
    command
        .arg("start")
        .arg("--foreground")
        .arg("--name")
        .arg(&config.paths.name)
        .current_dir(&config.project_root)
        .stdin(std::process::Stdio::null())
        .stdout(log_file)
        .stderr(log_file_err)
        .process_group(0);

    let child = command.spawn().map_err(|e| ExitError::new(1, format!("failed to spawn daemon process: {e}")))?;
    let child_pid = child.id();
    std::mem::forget(child); // intentionally detached: we never wait() on it

    wait_for_pid_file(&config.paths.pid_path, Duration::from_secs(5))?;
    println!("started daemon '{}' (pid {child_pid})", config.paths.name);
    Ok(0)
}

fn wait_for_pid_file(path: &std::path::Path, timeout: Duration) -> Result<(), ExitError> {
    let deadline = std::time::Instant::now() + timeout;
    loop {
        if path.exists() {
            return Ok(());
        }
        if std::time::Instant::now() >= deadline {
            return Err(ExitError::new(1, "daemon process did not write a pid file in time"));
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}

