// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

use super::*;

fn sample_yaml() -> &'static str {
    r#"
version: "1.0.0"
status: [open, in_progress, completed]
stage: [idea, intake_complete, plan_complete, in_progress, done]
states:
  idea:
    status: open
    stage: idea
  done:
    status: completed
    stage: done
terminal_states: [done]
invariants:
  - name: requires_work_item_context
    when: pre
    expression: "len(description) > 100"
commands:
  intake:
    from: [idea]
    to: done
    actor: PM
    pre: [requires_work_item_context]
metadata:
  roles: [PM, Patch]
"#
}

#[test]
fn deserializes_from_yaml() {
    let descriptor: WorkflowDescriptor = serde_yaml::from_str(sample_yaml()).unwrap();
    assert_eq!(descriptor.version, "1.0.0");
    assert_eq!(descriptor.states.len(), 2);
    assert!(descriptor.is_terminal("done"));
    assert!(!descriptor.is_terminal("idea"));
    assert!(descriptor.command("intake").is_some());
    assert!(descriptor.invariant("requires_work_item_context").is_some());
}
