// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! V-SM: state-machine consistency checks (spec §4.3).

use crate::descriptor::WorkflowDescriptor;
use crate::validator::finding::Finding;
use std::collections::{HashMap, HashSet};

pub fn check(descriptor: &WorkflowDescriptor) -> Vec<Finding> {
    let mut findings = Vec::new();

    let status_set: HashSet<&str> = descriptor.status.iter().map(String::as_str).collect();
    let stage_set: HashSet<&str> = descriptor.stage.iter().map(String::as_str).collect();

    // (1) every referenced status/stage is declared.
    for (alias, state) in &descriptor.states {
        if !status_set.contains(state.status.as_str()) {
            findings.push(Finding::error(
                "V-SM01",
                format!("state {alias:?} references undeclared status {:?}", state.status),
            ));
        }
        if !stage_set.contains(state.stage.as_str()) {
            findings.push(Finding::error(
                "V-SM01",
                format!("state {alias:?} references undeclared stage {:?}", state.stage),
            ));
        }
    }

    // (2) every `to` and every `from` resolves to a declared alias.
    for (name, command) in &descriptor.commands {
        if !descriptor.states.contains_key(&command.to) {
            findings.push(Finding::error(
                "V-SM02",
                format!("command {name:?} has unresolved `to` alias {:?}", command.to),
            ));
        }
        for from in &command.from {
            if !descriptor.states.contains_key(from) {
                findings.push(Finding::error(
                    "V-SM02",
                    format!("command {name:?} has unresolved `from` alias {:?}", from),
                ));
            }
        }
    }

    // (3) every non-initial alias is reachable via some command's `to`.
    // The first declared alias (insertion order) is treated as initial.
    let initial = descriptor.states.keys().next().cloned();
    let reachable: HashSet<&str> = descriptor.commands.values().map(|c| c.to.as_str()).collect();
    for alias in descriptor.states.keys() {
        if Some(alias.clone()) == initial {
            continue;
        }
        if !reachable.contains(alias.as_str()) {
            findings.push(Finding::error(
                "V-SM03",
                format!("state {alias:?} is unreachable: no command's `to` resolves to it"),
            ));
        }
    }

    // (4) every non-terminal state has at least one outbound command.
    let has_outbound: HashSet<&str> =
        descriptor.commands.values().flat_map(|c| c.from.iter().map(String::as_str)).collect();
    for alias in descriptor.states.keys() {
        if descriptor.is_terminal(alias) {
            continue;
        }
        if !has_outbound.contains(alias.as_str()) {
            findings.push(Finding::error(
                "V-SM04",
                format!("state {alias:?} is a dead end: no outbound command and not in terminal_states"),
            ));
        }
    }

    // (5) every terminal_states entry is a declared alias.
    for alias in &descriptor.terminal_states {
        if !descriptor.states.contains_key(alias) {
            findings.push(Finding::error(
                "V-SM05",
                format!("terminal_states references undeclared alias {alias:?}"),
            ));
        }
    }

    // (6) no two aliases resolve to the same (status, stage) tuple.
    let mut seen: HashMap<(&str, &str), &str> = HashMap::new();
    for (alias, state) in &descriptor.states {
        let key = (state.status.as_str(), state.stage.as_str());
        if let Some(other) = seen.get(&key) {
            findings.push(Finding::error(
                "V-SM06",
                format!("states {other:?} and {alias:?} both resolve to ({:?}, {:?})", state.status, state.stage),
            ));
        } else {
            seen.insert(key, alias);
        }
    }

    findings
}

#[cfg(test)]
#[path = "state_machine_tests.rs"]
mod tests;
