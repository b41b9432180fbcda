// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

use super::*;
use tempfile::tempdir;

const MINIMAL_YAML: &str = r#"
version: "1.0.0"
status: [open]
stage: [idea]
states:
  idea:
    status: open
    stage: idea
terminal_states: [idea]
"#;

#[test]
fn loads_yaml_by_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("descriptor.yaml");
    std::fs::write(&path, MINIMAL_YAML).unwrap();
    let descriptor = load(&path).unwrap();
    assert_eq!(descriptor.version, "1.0.0");
}

#[test]
fn loads_json_by_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("descriptor.json");
    let descriptor: WorkflowDescriptor = serde_yaml::from_str(MINIMAL_YAML).unwrap();
    std::fs::write(&path, serde_json::to_string(&descriptor).unwrap()).unwrap();
    let reloaded = load(&path).unwrap();
    assert_eq!(reloaded.version, "1.0.0");
}

#[test]
fn missing_file_is_not_found() {
    let dir = tempdir().unwrap();
    let err = load(dir.path().join("missing.yaml")).unwrap_err();
    assert!(matches!(err, LoadError::NotFound(_)));
}

#[test]
fn unrecognized_extension_errors() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("descriptor.toml");
    std::fs::write(&path, MINIMAL_YAML).unwrap();
    let err = load(&path).unwrap_err();
    assert!(matches!(err, LoadError::UnknownFormat { .. }));
}

#[test]
fn load_from_dir_prefers_yaml_over_json() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("workflow.yaml"), MINIMAL_YAML).unwrap();
    std::fs::write(dir.path().join("workflow.json"), "{}").unwrap();
    let descriptor = load_from_dir(dir.path()).unwrap();
    assert_eq!(descriptor.version, "1.0.0");
}
