// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! `ampad list` (spec §4.8): list registered `ScheduledCommand`s with
//! their store-resident state.

use crate::config::Config;
use crate::exit_error::ExitError;
use crate::output::{print_json, print_row};
use ampa_store::SchedulerStore;
use serde::Serialize;
use serde_json::json;

#[derive(Serialize)]
struct CommandRow {
    command_id: String,
    command_type: String,
    interval_secs: u64,
    last_run_at: Option<chrono::DateTime<chrono::Utc>>,
    in_flight: bool,
}

pub fn run(config: Config, as_json: bool) -> Result<i32, ExitError> {
    let store = SchedulerStore::load(&config.paths.store_path)
        .map_err(|e| ExitError::new(1, format!("failed to load scheduler store: {e}")))?;

    let mut commands = store.commands();
    commands.sort_by(|a, b| a.command_id.as_str().cmp(b.command_id.as_str()));

    let rows: Vec<CommandRow> = commands
        .iter()
        .map(|c| CommandRow {
            command_id: c.command_id.as_str().to_string(),
            command_type: c.command_type.to_string(),
            interval_secs: c.interval.as_secs(),
            last_run_at: store.last_run_at(c.command_id.as_str()),
            in_flight: store.is_in_flight(c.command_id.as_str()),
        })
        .collect();

    if as_json {
        print_json(&json!({ "commands": rows }));
        return Ok(0);
    }

    if rows.is_empty() {
        println!("no scheduled commands registered");
        return Ok(0);
    }

    for row in &rows {
        let last_run = row.last_run_at.map(|t| t.to_rfc3339()).unwrap_or_else(|| "never".to_string());
        let flight = if row.in_flight { "in-flight" } else { "idle" };
        print_row(&row.command_id, &[row.command_type.clone(), format!("every {}s", row.interval_secs), last_run, flight.to_string()]);
    }
    Ok(0)
}
