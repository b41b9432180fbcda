// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

use super::*;
use serial_test::serial;
use tempfile::tempdir;

const VALID_DESCRIPTOR: &str = r#"
version: "1.0.0"
status: [open, completed]
stage: [idea, done]
states:
  idea: { status: open, stage: idea }
  done: { status: completed, stage: done }
terminal_states: [done]
invariants:
  - { name: requires_work_item_context, when: pre, expression: "" }
  - { name: requires_acceptance_criteria, when: pre, expression: "" }
  - { name: no_in_progress_items, when: pre, expression: "" }
  - { name: audit_recommends_closure, when: pre, expression: "" }
  - { name: audit_does_not_recommend_closure, when: pre, expression: "" }
commands:
  advance:
    from: [idea]
    to: done
    actor: PM
    description: advance the item
  delegate:
    from: [idea]
    to: done
    actor: PM
    description: delegate the item
    pre: [requires_work_item_context, requires_acceptance_criteria, no_in_progress_items]
  close_with_audit:
    from: [idea]
    to: done
    actor: PM
    description: close after a passing audit
    pre: [audit_recommends_closure]
  audit_fail:
    from: [idea]
    to: done
    actor: PM
    description: mark an audit failure
    pre: [audit_does_not_recommend_closure]
  escalate:
    from: [idea]
    to: done
    actor: PM
    description: escalate to a human
    inputs:
      reason: { type: string, required: true }
metadata:
  roles: [PM]
"#;

fn clear_env() {
    for key in [
        "AMPA_PROJECT_ROOT",
        "AMPA_SCHEDULER_STORE",
        "AMPA_WORKLOG_BIN",
        "AMPA_DISCORD_WEBHOOK",
        "AMPA_DISCORD_BOT_TOKEN",
        "AMPA_NOTIFY_CHANNEL",
        "AMPA_GITHUB_REPO",
        "AMPA_VERIFY_PR_WITH_GH",
        "AMPA_RUN_SCHEDULER",
        "AMPA_DELEGATION_ASSIGNEE",
        "AMPA_LOG_LEVEL",
        "RUST_LOG",
        "AMPA_TICK_INTERVAL_MS",
        "AMPA_SHUTDOWN_GRACE_SECS",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
#[serial]
fn assemble_defaults_run_scheduler_to_true_when_unset() {
    clear_env();
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("workflow.yaml"), VALID_DESCRIPTOR).unwrap();
    std::env::set_var("AMPA_PROJECT_ROOT", dir.path());

    let config = Config::assemble("default".to_string(), None).unwrap();
    assert!(config.run_scheduler);
    assert_eq!(config.delegation_assignee, "Patch");
    assert_eq!(config.notify_channel, "general");
    assert_eq!(config.tick_interval, ampa_engine::scheduler::DEFAULT_TICK);
    assert_eq!(config.shutdown_grace, ampa_engine::scheduler::SHUTDOWN_GRACE);
    clear_env();
}

#[test]
#[serial]
fn assemble_honors_a_millisecond_tick_interval_override() {
    clear_env();
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("workflow.yaml"), VALID_DESCRIPTOR).unwrap();
    std::env::set_var("AMPA_PROJECT_ROOT", dir.path());
    std::env::set_var("AMPA_TICK_INTERVAL_MS", "5");
    std::env::set_var("AMPA_SHUTDOWN_GRACE_SECS", "1");

    let config = Config::assemble("default".to_string(), None).unwrap();
    assert_eq!(config.tick_interval, std::time::Duration::from_millis(5));
    assert_eq!(config.shutdown_grace, std::time::Duration::from_secs(1));
    clear_env();
}

#[test]
#[serial]
fn assemble_honors_an_explicit_false_run_scheduler() {
    clear_env();
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("workflow.yaml"), VALID_DESCRIPTOR).unwrap();
    std::env::set_var("AMPA_PROJECT_ROOT", dir.path());
    std::env::set_var("AMPA_RUN_SCHEDULER", "0");

    let config = Config::assemble("default".to_string(), None).unwrap();
    assert!(!config.run_scheduler);
    clear_env();
}

#[test]
#[serial]
fn assemble_fails_with_exit_code_two_when_descriptor_is_missing() {
    clear_env();
    let dir = tempdir().unwrap();
    std::env::set_var("AMPA_PROJECT_ROOT", dir.path());

    let err = Config::assemble("default".to_string(), None).unwrap_err();
    assert_eq!(err.code, 2);
    clear_env();
}

#[test]
#[serial]
fn assemble_fails_with_exit_code_one_on_a_validation_error() {
    clear_env();
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("workflow.yaml"), "version: \"1.0.0\"\n").unwrap();
    std::env::set_var("AMPA_PROJECT_ROOT", dir.path());

    let err = Config::assemble("default".to_string(), None).unwrap_err();
    assert_eq!(err.code, 1);
    clear_env();
}

#[test]
fn env_bool_parses_common_truthy_and_falsy_spellings() {
    assert_eq!(parse_bool_literal("1"), Some(true));
    assert_eq!(parse_bool_literal("true"), Some(true));
    assert_eq!(parse_bool_literal("YES"), Some(true));
    assert_eq!(parse_bool_literal("0"), Some(false));
    assert_eq!(parse_bool_literal("false"), Some(false));
    assert_eq!(parse_bool_literal("maybe"), None);
}

fn parse_bool_literal(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
