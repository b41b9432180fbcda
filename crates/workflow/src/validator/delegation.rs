// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! V-D: delegation-specific rules (spec §4.3). These assume the
//! descriptor declares the fixed command vocabulary the delegation
//! engine drives (`delegate`, `close_with_audit`, `audit_fail`,
//! `escalate`); a descriptor missing one of them fails the corresponding
//! check rather than being silently skipped.

use crate::descriptor::WorkflowDescriptor;
use crate::validator::finding::Finding;

pub fn check(descriptor: &WorkflowDescriptor) -> Vec<Finding> {
    let mut findings = Vec::new();

    check_requires_pre(descriptor, "delegate", &[
        "requires_work_item_context",
        "requires_acceptance_criteria",
        "no_in_progress_items",
    ], "V-D01", &mut findings);

    check_requires_pre(descriptor, "close_with_audit", &["audit_recommends_closure"], "V-D02", &mut findings);

    check_requires_pre(descriptor, "audit_fail", &["audit_does_not_recommend_closure"], "V-D03", &mut findings);

    match descriptor.command("escalate") {
        Some(command) => match command.inputs.get("reason") {
            Some(input) if input.required => {}
            Some(_) => findings.push(Finding::error(
                "V-D04",
                "escalate.inputs.reason must be declared with required: true",
            )),
            None => findings
                .push(Finding::error("V-D04", "escalate.inputs must declare a `reason` field")),
        },
        None => findings.push(Finding::error("V-D04", "descriptor is missing the `escalate` command")),
    }

    match descriptor.command("delegate") {
        Some(command) if command.actor != "PM" => findings.push(Finding::error(
            "V-D05",
            format!("delegate.actor must be PM, found {:?}", command.actor),
        )),
        None => findings.push(Finding::error("V-D05", "descriptor is missing the `delegate` command")),
        _ => {}
    }

    findings
}

fn check_requires_pre(
    descriptor: &WorkflowDescriptor,
    command_name: &str,
    required: &[&str],
    code: &'static str,
    findings: &mut Vec<Finding>,
) {
    match descriptor.command(command_name) {
        Some(command) => {
            for name in required {
                if !command.pre.iter().any(|p| p == name) {
                    findings.push(Finding::error(
                        code,
                        format!("{command_name}.pre[] must include {name:?}"),
                    ));
                }
            }
        }
        None => findings.push(Finding::error(code, format!("descriptor is missing the `{command_name}` command"))),
    }
}

#[cfg(test)]
#[path = "delegation_tests.rs"]
mod tests;
