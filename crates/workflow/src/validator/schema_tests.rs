// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

use super::*;
use crate::fixtures::minimal_valid_descriptor;

#[test]
fn minimal_descriptor_has_no_findings() {
    assert!(check(&minimal_valid_descriptor()).is_empty());
}

#[test]
fn bad_version_format_is_an_error() {
    let mut d = minimal_valid_descriptor();
    d.version = "v1".to_string();
    let findings = check(&d);
    assert!(findings.iter().any(|f| f.code == "V-S01"));
}

#[test]
fn empty_status_is_an_error() {
    let mut d = minimal_valid_descriptor();
    d.status.clear();
    let findings = check(&d);
    assert!(findings.iter().any(|f| f.code == "V-S02"));
}

#[test]
fn duplicate_stage_is_an_error() {
    let mut d = minimal_valid_descriptor();
    d.stage.push("idea".to_string());
    let findings = check(&d);
    assert!(findings.iter().any(|f| f.code == "V-S03"));
}

#[test]
fn no_commands_is_an_error() {
    let mut d = minimal_valid_descriptor();
    d.commands.clear();
    let findings = check(&d);
    assert!(findings.iter().any(|f| f.code == "V-S04"));
}

#[test]
fn missing_command_description_is_an_error() {
    let mut d = minimal_valid_descriptor();
    d.commands.get_mut("advance").unwrap().description.clear();
    let findings = check(&d);
    assert!(findings.iter().any(|f| f.code == "V-S05"));
}

#[test]
fn unknown_input_type_is_an_error() {
    let mut d = minimal_valid_descriptor();
    d.commands.get_mut("advance").unwrap().inputs.insert(
        "reason".to_string(),
        crate::descriptor::InputDecl { input_type: "text".to_string(), required: true },
    );
    let findings = check(&d);
    assert!(findings.iter().any(|f| f.code == "V-S06"));
}

#[test]
fn unknown_invariant_when_is_an_error() {
    let mut d = minimal_valid_descriptor();
    d.invariants.push(crate::fixtures::invariant("x", "sometimes"));
    let findings = check(&d);
    assert!(findings.iter().any(|f| f.code == "V-S07"));
}

#[test]
fn unknown_top_level_key_is_an_error() {
    let mut d = minimal_valid_descriptor();
    d.extra.insert("spooky".to_string(), serde_json::json!(true));
    let findings = check(&d);
    assert!(findings.iter().any(|f| f.code == "V-S08"));
}
