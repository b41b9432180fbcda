// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

use super::*;
use chrono::TimeZone;

fn run(start: i64, finish: Option<i64>) -> CommandRun {
    CommandRun {
        id: RunId::new(),
        command_id: "triage-audit".to_string(),
        started_at: Utc.timestamp_opt(start, 0).unwrap(),
        finished_at: finish.map(|f| Utc.timestamp_opt(f, 0).unwrap()),
        exit_code: Some(0),
        stdout_excerpt: String::new(),
        stderr_excerpt: String::new(),
        note: None,
    }
}

#[test]
fn non_overlapping_runs_do_not_overlap() {
    let a = run(0, Some(10));
    let b = run(20, Some(30));
    assert!(!a.overlaps(&b));
    assert!(!b.overlaps(&a));
}

#[test]
fn overlapping_runs_detected() {
    let a = run(0, Some(20));
    let b = run(10, Some(30));
    assert!(a.overlaps(&b));
    assert!(b.overlaps(&a));
}

#[test]
fn unfinished_run_overlaps_anything_started_after_it() {
    let a = run(0, None);
    let b = run(10, Some(20));
    assert!(a.overlaps(&b));
}

#[test]
fn run_id_has_run_prefix() {
    assert!(RunId::new().as_str().starts_with("run-"));
}
