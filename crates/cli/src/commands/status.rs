// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! `ampad status` (spec §4.8): report running/stopped, and when
//! stopped, surface the tail of the instance log as a diagnostic.
//! `--json` additionally reports `workflow_version` and `uptime_secs`
//! (SPEC_FULL.md supplemental fields), purely observational.

use crate::config::Config;
use crate::exit_error::ExitError;
use crate::output::print_json;
use ampa_daemon::{OwnershipCheck, PidFile};
use ampa_store::SchedulerStore;
use serde_json::json;

const LOG_TAIL_LINES: usize = 20;

pub fn run(config: Config, as_json: bool) -> Result<i32, ExitError> {
    let pid_file = PidFile::new(&config.paths.pid_path);
    let tokens = config.paths.ownership_tokens();

    let check = pid_file.check(&tokens).map_err(|e| ExitError::new(1, format!("failed to check pid file: {e}")))?;
    let running = matches!(check, OwnershipCheck::Owned(_));
    let uptime_secs = running.then(|| uptime_secs(&config)).flatten();

    if as_json {
        let pid = match check {
            OwnershipCheck::Owned(pid) => Some(pid),
            _ => None,
        };
        print_json(&json!({
            "name": config.paths.name,
            "running": running,
            "pid": pid,
            "workflow_version": config.descriptor.version,
            "uptime_secs": uptime_secs,
        }));
        return Ok(if running { 0 } else { 3 });
    }

    match check {
        OwnershipCheck::Owned(pid) => {
            println!("daemon '{}' is running (pid {pid})", config.paths.name);
            Ok(0)
        }
        OwnershipCheck::Absent | OwnershipCheck::Stale(_) => {
            println!("daemon '{}' is stopped", config.paths.name);
            if let Some(tail) = log_tail(&config.paths.log_path) {
                println!("--- last {LOG_TAIL_LINES} lines of {} ---", config.paths.log_path.display());
                println!("{tail}");
            }
            Ok(3)
        }
    }
}

fn uptime_secs(config: &Config) -> Option<i64> {
    let store = SchedulerStore::load(&config.paths.store_path).ok()?;
    let started = store.last_global_start_ts()?;
    Some((chrono::Utc::now() - started).num_seconds().max(0))
}

fn log_tail(path: &std::path::Path) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    let lines: Vec<&str> = content.lines().collect();
    let start = lines.len().saturating_sub(LOG_TAIL_LINES);
    Some(lines[start..].join("\n"))
}
