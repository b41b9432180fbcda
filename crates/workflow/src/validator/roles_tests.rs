// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

use super::*;
use crate::fixtures::minimal_valid_descriptor;

#[test]
fn minimal_descriptor_has_no_findings() {
    assert!(check(&minimal_valid_descriptor()).is_empty());
}

#[test]
fn undeclared_actor_is_an_error() {
    let mut d = minimal_valid_descriptor();
    d.commands.get_mut("advance").unwrap().actor = "Nobody".to_string();
    let findings = check(&d);
    assert!(findings.iter().any(|f| f.code == "V-R01"));
}

#[test]
fn duplicate_role_is_an_error() {
    let mut d = minimal_valid_descriptor();
    d.metadata.roles.push("PM".to_string());
    let findings = check(&d);
    assert!(findings.iter().any(|f| f.code == "V-R02"));
}
