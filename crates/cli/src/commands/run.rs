// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! `ampad run <command_id>` (spec §4.2, §4.8): force-run a single
//! scheduled command in the foreground, bypassing its cooldown but
//! still honoring the `in_flight` exclusion, without advancing
//! `last_run_at`.

use crate::config::Config;
use crate::deps;
use crate::exit_error::ExitError;
use crate::output::print_json;
use ampa_engine::scheduler;
use serde_json::json;

pub async fn run(config: Config, command_id: &str, as_json: bool) -> Result<i32, ExitError> {
    let scheduler_deps = deps::build(&config)?;

    let Some(outcome) = scheduler::run_once(&scheduler_deps, command_id).await else {
        return Err(ExitError::new(1, format!("no scheduled command registered with id '{command_id}'")));
    };

    let history = scheduler_deps.store.history(command_id);
    let latest = history.last();
    let exit_code = outcome.exit_code.unwrap_or(0);

    if as_json {
        print_json(&json!({
            "command_id": command_id,
            "dispatched": outcome.dispatched.is_some(),
            "exit_code": outcome.exit_code,
            "note": latest.and_then(|r| r.note.clone()),
            "stdout_excerpt": latest.map(|r| r.stdout_excerpt.clone()),
        }));
    } else if outcome.dispatched.is_some() {
        println!("ran '{command_id}' (exit {exit_code})");
        if let Some(run) = latest {
            if !run.stdout_excerpt.is_empty() {
                println!("{}", run.stdout_excerpt);
            }
            if let Some(note) = &run.note {
                println!("note: {note}");
            }
        }
    } else {
        println!("'{command_id}' is already in flight, skipped");
    }

    Ok(exit_code)
}
