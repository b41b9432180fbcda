// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! V-I: invariant reference checks (spec §4.3).

use crate::descriptor::WorkflowDescriptor;
use crate::validator::finding::Finding;
use std::collections::HashSet;

pub fn check(descriptor: &WorkflowDescriptor) -> Vec<Finding> {
    let mut findings = Vec::new();

    let declared: HashSet<&str> = descriptor.invariants.iter().map(|i| i.name.as_str()).collect();

    // (1) every name referenced in pre/post is declared.
    for (cmd_name, command) in &descriptor.commands {
        for referenced in command.pre.iter().chain(command.post.iter()) {
            if !declared.contains(referenced.as_str()) {
                findings.push(Finding::error(
                    "V-I01",
                    format!("command {cmd_name:?} references undeclared invariant {referenced:?}"),
                ));
            }
        }
    }

    // (2) names in invariants[] are unique.
    let mut seen = HashSet::new();
    for invariant in &descriptor.invariants {
        if !seen.insert(invariant.name.as_str()) {
            findings.push(Finding::error(
                "V-I02",
                format!("invariant name {:?} is declared more than once", invariant.name),
            ));
        }
    }

    // (3) warn on a pre-only invariant used in a post list (or vice versa).
    for (cmd_name, command) in &descriptor.commands {
        for name in &command.pre {
            if let Some(inv) = descriptor.invariant(name) {
                if inv.when == "post" {
                    findings.push(Finding::warning(
                        "V-I03",
                        format!(
                            "command {cmd_name:?} uses {name:?} as a precondition but it is declared when=post"
                        ),
                    ));
                }
            }
        }
        for name in &command.post {
            if let Some(inv) = descriptor.invariant(name) {
                if inv.when == "pre" {
                    findings.push(Finding::warning(
                        "V-I03",
                        format!(
                            "command {cmd_name:?} uses {name:?} as a postcondition but it is declared when=pre"
                        ),
                    ));
                }
            }
        }
    }

    findings
}

#[cfg(test)]
#[path = "invariants_tests.rs"]
mod tests;
