// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! The five-family workflow descriptor validator (spec §4.3). Runs at
//! daemon start; refuses to start on any V-* ERROR.

pub mod delegation;
pub mod finding;
pub mod invariants;
pub mod roles;
pub mod schema;
pub mod state_machine;

use crate::descriptor::WorkflowDescriptor;
pub use finding::{Finding, Severity, ValidationReport};
use tracing::warn;

pub fn validate(descriptor: &WorkflowDescriptor) -> ValidationReport {
    let mut findings = Vec::new();
    findings.extend(schema::check(descriptor));
    findings.extend(state_machine::check(descriptor));
    findings.extend(invariants::check(descriptor));
    findings.extend(roles::check(descriptor));
    findings.extend(delegation::check(descriptor));

    let report = ValidationReport { findings };
    if report.has_errors() {
        warn!(error_count = report.errors().count(), "workflow descriptor failed validation");
    }
    report
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
