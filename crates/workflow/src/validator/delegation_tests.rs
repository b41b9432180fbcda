// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

use super::*;
use crate::fixtures::delegation_ready_descriptor;

#[test]
fn ready_descriptor_has_no_findings() {
    assert!(check(&delegation_ready_descriptor()).is_empty());
}

#[test]
fn delegate_missing_a_required_precondition_is_an_error() {
    let mut d = delegation_ready_descriptor();
    d.commands.get_mut("delegate").unwrap().pre.retain(|p| p != "no_in_progress_items");
    let findings = check(&d);
    assert!(findings.iter().any(|f| f.code == "V-D01"));
}

#[test]
fn close_with_audit_missing_precondition_is_an_error() {
    let mut d = delegation_ready_descriptor();
    d.commands.get_mut("close_with_audit").unwrap().pre.clear();
    let findings = check(&d);
    assert!(findings.iter().any(|f| f.code == "V-D02"));
}

#[test]
fn audit_fail_missing_precondition_is_an_error() {
    let mut d = delegation_ready_descriptor();
    d.commands.get_mut("audit_fail").unwrap().pre.clear();
    let findings = check(&d);
    assert!(findings.iter().any(|f| f.code == "V-D03"));
}

#[test]
fn escalate_reason_not_required_is_an_error() {
    let mut d = delegation_ready_descriptor();
    d.commands.get_mut("escalate").unwrap().inputs.get_mut("reason").unwrap().required = false;
    let findings = check(&d);
    assert!(findings.iter().any(|f| f.code == "V-D04"));
}

#[test]
fn escalate_missing_reason_input_is_an_error() {
    let mut d = delegation_ready_descriptor();
    d.commands.get_mut("escalate").unwrap().inputs.clear();
    let findings = check(&d);
    assert!(findings.iter().any(|f| f.code == "V-D04"));
}

#[test]
fn delegate_actor_must_be_pm() {
    let mut d = delegation_ready_descriptor();
    d.commands.get_mut("delegate").unwrap().actor = "Patch".to_string();
    let findings = check(&d);
    assert!(findings.iter().any(|f| f.code == "V-D05"));
}

#[test]
fn missing_delegate_command_is_an_error() {
    let mut d = delegation_ready_descriptor();
    d.commands.shift_remove("delegate");
    let findings = check(&d);
    assert!(findings.iter().any(|f| f.code == "V-D01"));
    assert!(findings.iter().any(|f| f.code == "V-D05"));
}
