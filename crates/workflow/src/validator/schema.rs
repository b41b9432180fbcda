// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! V-S: JSON-schema-level checks on the descriptor file (spec §4.3).

use crate::descriptor::{WorkflowDescriptor, ALLOWED_INPUT_TYPES, ALLOWED_INVARIANT_WHEN};
use crate::validator::finding::Finding;
use regex::Regex;
use std::collections::HashSet;

const VERSION_PATTERN: &str = r"^\d+\.\d+\.\d+$";

#[allow(clippy::expect_used)]
pub fn check(descriptor: &WorkflowDescriptor) -> Vec<Finding> {
    let mut findings = Vec::new();

    let version_re = Regex::new(VERSION_PATTERN).expect("static regex is valid");
    if !version_re.is_match(&descriptor.version) {
        findings.push(Finding::error(
            "V-S01",
            format!("version {:?} does not match {VERSION_PATTERN}", descriptor.version),
        ));
    }

    check_unique_non_empty(&descriptor.status, "status", "V-S02", &mut findings);
    check_unique_non_empty(&descriptor.stage, "stage", "V-S03", &mut findings);

    if descriptor.commands.is_empty() {
        findings.push(Finding::error("V-S04", "commands must have at least one entry"));
    }

    for (name, command) in &descriptor.commands {
        if command.description.trim().is_empty() {
            findings.push(Finding::error(
                "V-S05",
                format!("command {name:?} is missing a description"),
            ));
        }
        for (input_name, input) in &command.inputs {
            if !ALLOWED_INPUT_TYPES.contains(&input.input_type.as_str()) {
                findings.push(Finding::error(
                    "V-S06",
                    format!(
                        "command {name:?} input {input_name:?} has unknown type {:?} (expected one of {:?})",
                        input.input_type, ALLOWED_INPUT_TYPES
                    ),
                ));
            }
        }
    }

    for invariant in &descriptor.invariants {
        if !ALLOWED_INVARIANT_WHEN.contains(&invariant.when.as_str()) {
            findings.push(Finding::error(
                "V-S07",
                format!(
                    "invariant {:?} has unknown when {:?} (expected one of {:?})",
                    invariant.name, invariant.when, ALLOWED_INVARIANT_WHEN
                ),
            ));
        }
    }

    if !descriptor.extra.is_empty() {
        let mut keys: Vec<&String> = descriptor.extra.keys().collect();
        keys.sort();
        findings.push(Finding::error(
            "V-S08",
            format!("unknown top-level key(s): {}", keys.iter().map(|k| k.as_str()).collect::<Vec<_>>().join(", ")),
        ));
    }

    findings
}

fn check_unique_non_empty(values: &[String], label: &str, code: &'static str, findings: &mut Vec<Finding>) {
    if values.is_empty() {
        findings.push(Finding::error(code, format!("{label}[] must be non-empty")));
        return;
    }
    let mut seen = HashSet::new();
    for v in values {
        if !seen.insert(v) {
            findings.push(Finding::error(code, format!("{label}[] contains duplicate entry {v:?}")));
        }
    }
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
