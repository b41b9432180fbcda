// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! `ampad stop` (spec §4.8): signal the owned pid, wait up to 10s,
//! escalate to a force-kill, then remove the pid file.

use crate::config::Config;
use crate::exit_error::ExitError;
use ampa_daemon::{is_process_alive, signal, OwnershipCheck, PidFile};
use nix::sys::signal::Signal;
use std::time::Duration;

const WAIT_TIMEOUT: Duration = Duration::from_secs(10);

pub fn run(config: Config) -> Result<i32, ExitError> {
    let pid_file = PidFile::new(&config.paths.pid_path);
    let tokens = config.paths.ownership_tokens();

    let pid = match pid_file.check(&tokens).map_err(|e| ExitError::new(1, format!("failed to check pid file: {e}")))? {
        OwnershipCheck::Absent => {
            println!("daemon '{}' is already stopped", config.paths.name);
            return Ok(0);
        }
        OwnershipCheck::Stale(_) => {
            println!("daemon '{}' is already stopped (stale pid file removed)", config.paths.name);
            return Ok(0);
        }
        OwnershipCheck::Owned(pid) => pid,
    };

    signal(pid, Signal::SIGTERM).map_err(|e| ExitError::new(1, format!("failed to signal pid {pid}: {e}")))?;

    let deadline = std::time::Instant::now() + WAIT_TIMEOUT;
    while is_process_alive(pid) {
        if std::time::Instant::now() >= deadline {
            signal(pid, Signal::SIGKILL)
                .map_err(|e| ExitError::new(1, format!("failed to force-kill pid {pid}: {e}")))?;
            break;
        }
        std::thread::sleep(Duration::from_millis(100));
    }

    let _ = pid_file.remove();
    println!("stopped daemon '{}' (pid {pid})", config.paths.name);
    Ok(0)
}
