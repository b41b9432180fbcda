// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! Test-only descriptor builders shared across the validator family tests.

#![cfg(test)]

use crate::descriptor::{CommandDecl, Effects, InvariantDecl, Metadata, StateAlias, WorkflowDescriptor};
use indexmap::IndexMap;

pub fn command(from: &[&str], to: &str, actor: &str) -> CommandDecl {
    CommandDecl {
        from: from.iter().map(|s| s.to_string()).collect(),
        to: to.to_string(),
        actor: actor.to_string(),
        description: "a command".to_string(),
        pre: Vec::new(),
        post: Vec::new(),
        inputs: IndexMap::new(),
        effects: Effects::default(),
    }
}

pub fn invariant(name: &str, when: &str) -> InvariantDecl {
    InvariantDecl { name: name.to_string(), when: when.to_string(), expression: String::new() }
}

/// A descriptor that passes every validator family unmodified: two states
/// (`idea`, `done`), one command `idea -> done`, no invariants, one role.
pub fn minimal_valid_descriptor() -> WorkflowDescriptor {
    let mut states = IndexMap::new();
    states.insert("idea".to_string(), StateAlias { status: "open".to_string(), stage: "idea".to_string() });
    states
        .insert("done".to_string(), StateAlias { status: "completed".to_string(), stage: "done".to_string() });

    let mut commands = IndexMap::new();
    commands.insert("advance".to_string(), command(&["idea"], "done", "PM"));

    WorkflowDescriptor {
        version: "1.0.0".to_string(),
        status: vec!["open".to_string(), "completed".to_string()],
        stage: vec!["idea".to_string(), "done".to_string()],
        states,
        terminal_states: vec!["done".to_string()],
        invariants: Vec::new(),
        commands,
        metadata: Metadata { roles: vec!["PM".to_string()] },
        extra: serde_json::Map::new(),
    }
}

/// Builds on [`minimal_valid_descriptor`] by adding the fixed command
/// vocabulary V-D checks against: `delegate`, `close_with_audit`,
/// `audit_fail`, `escalate`, each already satisfying its rule.
pub fn delegation_ready_descriptor() -> WorkflowDescriptor {
    let mut d = minimal_valid_descriptor();

    for name in [
        "requires_work_item_context",
        "requires_acceptance_criteria",
        "no_in_progress_items",
        "audit_recommends_closure",
        "audit_does_not_recommend_closure",
    ] {
        d.invariants.push(invariant(name, "pre"));
    }

    let mut delegate = command(&["idea"], "done", "PM");
    delegate.pre = vec![
        "requires_work_item_context".to_string(),
        "requires_acceptance_criteria".to_string(),
        "no_in_progress_items".to_string(),
    ];
    d.commands.insert("delegate".to_string(), delegate);

    let mut close_with_audit = command(&["idea"], "done", "PM");
    close_with_audit.pre = vec!["audit_recommends_closure".to_string()];
    d.commands.insert("close_with_audit".to_string(), close_with_audit);

    let mut audit_fail = command(&["idea"], "done", "PM");
    audit_fail.pre = vec!["audit_does_not_recommend_closure".to_string()];
    d.commands.insert("audit_fail".to_string(), audit_fail);

    let mut escalate = command(&["idea"], "done", "PM");
    escalate.inputs.insert(
        "reason".to_string(),
        crate::descriptor::InputDecl { input_type: "string".to_string(), required: true },
    );
    d.commands.insert("escalate".to_string(), escalate);

    d
}
