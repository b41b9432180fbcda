// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! V-R: role reference checks (spec §4.3).

use crate::descriptor::WorkflowDescriptor;
use crate::validator::finding::Finding;
use std::collections::HashSet;

pub fn check(descriptor: &WorkflowDescriptor) -> Vec<Finding> {
    let mut findings = Vec::new();

    let declared: HashSet<&str> = descriptor.metadata.roles.iter().map(String::as_str).collect();

    for (cmd_name, command) in &descriptor.commands {
        if !declared.contains(command.actor.as_str()) {
            findings.push(Finding::error(
                "V-R01",
                format!("command {cmd_name:?} has undeclared actor {:?}", command.actor),
            ));
        }
    }

    let mut seen = HashSet::new();
    for role in &descriptor.metadata.roles {
        if !seen.insert(role.as_str()) {
            findings.push(Finding::error("V-R02", format!("role {role:?} is declared more than once")));
        }
    }

    findings
}

#[cfg(test)]
#[path = "roles_tests.rs"]
mod tests;
