// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

use super::*;
use ampa_core::{CommandRun, RunId};
use chrono::TimeZone;
use std::collections::HashMap;
use std::time::Duration;
use tempfile::tempdir;

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

fn sample_command(id: &str) -> ScheduledCommand {
    ScheduledCommand {
        command_id: ampa_core::CommandId::new(id),
        command_type: ampa_core::CommandType::Custom,
        interval: Duration::from_secs(900),
        invocation: vec!["true".to_string()],
        metadata: HashMap::new(),
    }
}

fn dummy_run() -> CommandRun {
    CommandRun {
        id: RunId::new(),
        command_id: "c".to_string(),
        started_at: at(0),
        finished_at: Some(at(1)),
        exit_code: Some(0),
        stdout_excerpt: String::new(),
        stderr_excerpt: String::new(),
        note: None,
    }
}

#[test]
fn load_missing_file_yields_empty_store() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.json");
    let store = SchedulerStore::load(&path).unwrap();
    assert!(store.commands().is_empty());
    assert!(store.last_run_at("x").is_none());
}

#[test]
fn load_malformed_json_fails_and_leaves_file_untouched() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.json");
    fs::write(&path, b"not json").unwrap();
    let result = SchedulerStore::load(&path);
    assert!(result.is_err());
    assert_eq!(fs::read(&path).unwrap(), b"not json");
}

#[test]
fn save_then_load_round_trips_known_fields() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.json");
    let store = SchedulerStore::load(&path).unwrap();
    store.set_commands(vec![sample_command("triage-audit")]);
    store.set_last_run_at("triage-audit", at(100));
    store.set_last_audit("WL-1", at(200));
    store.record_run("triage-audit", dummy_run());
    store.save().unwrap();

    let reloaded = SchedulerStore::load(&path).unwrap();
    assert_eq!(reloaded.commands().len(), 1);
    assert_eq!(reloaded.last_run_at("triage-audit"), Some(at(100)));
    assert_eq!(reloaded.get_last_audit("WL-1"), Some(at(200)));
    assert_eq!(reloaded.history("triage-audit").len(), 1);
}

#[test]
fn round_trip_preserves_unknown_top_level_keys() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.json");
    fs::write(
        &path,
        serde_json::to_vec(&serde_json::json!({
            "commands": {},
            "last_run_at": {},
            "last_audit_at_by_item": {},
            "in_flight": {},
            "history": {},
            "future_field": {"nested": true},
        }))
        .unwrap(),
    )
    .unwrap();

    let store = SchedulerStore::load(&path).unwrap();
    store.save().unwrap();

    let raw: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(raw["future_field"]["nested"], serde_json::json!(true));
}

#[test]
fn record_run_trims_history_to_fifty() {
    let dir = tempdir().unwrap();
    let store = SchedulerStore::load(dir.path().join("store.json")).unwrap();
    for i in 0..60 {
        let mut run = dummy_run();
        run.exit_code = Some(i);
        store.record_run("c", run);
    }
    let history = store.history("c");
    assert_eq!(history.len(), 50);
    assert_eq!(history.first().unwrap().exit_code, Some(10));
    assert_eq!(history.last().unwrap().exit_code, Some(59));
}

#[test]
fn claim_in_flight_is_exclusive() {
    let dir = tempdir().unwrap();
    let store = SchedulerStore::load(dir.path().join("store.json")).unwrap();
    store.claim_in_flight("c", 111, at(0)).unwrap();
    let err = store.claim_in_flight("c", 222, at(1)).unwrap_err();
    assert!(matches!(err, StoreError::Busy { pid: 111, .. }));
    store.release_in_flight("c");
    store.claim_in_flight("c", 222, at(2)).unwrap();
}

#[test]
fn claim_in_flight_records_the_caller_supplied_timestamp() {
    let dir = tempdir().unwrap();
    let store = SchedulerStore::load(dir.path().join("store.json")).unwrap();
    store.claim_in_flight("c", 111, at(42)).unwrap();
    let claim = store.in_flight_claim("c").unwrap();
    assert_eq!(claim.started_at, at(42));
    assert_eq!(claim.pid, 111);
}

#[test]
fn set_last_audit_ignores_a_regression() {
    let dir = tempdir().unwrap();
    let store = SchedulerStore::load(dir.path().join("store.json")).unwrap();
    store.set_last_audit("WL-1", at(200));
    store.set_last_audit("WL-1", at(100));
    assert_eq!(store.get_last_audit("WL-1"), Some(at(200)));
    store.set_last_audit("WL-1", at(300));
    assert_eq!(store.get_last_audit("WL-1"), Some(at(300)));
}

#[test]
fn clear_stale_in_flight_drops_dead_pids_only() {
    let dir = tempdir().unwrap();
    let store = SchedulerStore::load(dir.path().join("store.json")).unwrap();
    store.claim_in_flight("alive", 1, at(0)).unwrap();
    store.claim_in_flight("dead", 2, at(0)).unwrap();
    store.clear_stale_in_flight(|pid| pid == 1);
    assert!(store.is_in_flight("alive"));
    assert!(!store.is_in_flight("dead"));
}

#[test]
fn compact_history_drops_unregistered_commands() {
    let dir = tempdir().unwrap();
    let store = SchedulerStore::load(dir.path().join("store.json")).unwrap();
    store.record_run("ghost", dummy_run());
    store.set_commands(vec![sample_command("kept")]);
    store.record_run("kept", dummy_run());
    store.compact_history();
    assert!(store.history("ghost").is_empty());
    assert_eq!(store.history("kept").len(), 1);
}
