// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

use super::*;
use tempfile::tempdir;

#[test]
fn write_read_remove_round_trip() {
    let dir = tempdir().unwrap();
    let pid_file = PidFile::new(dir.path().join("sub").join("default.pid"));

    assert_eq!(pid_file.read().unwrap(), None);
    pid_file.write(4242).unwrap();
    assert_eq!(pid_file.read().unwrap(), Some(4242));
    pid_file.remove().unwrap();
    assert_eq!(pid_file.read().unwrap(), None);
}

#[test]
fn remove_on_missing_file_is_not_an_error() {
    let dir = tempdir().unwrap();
    let pid_file = PidFile::new(dir.path().join("never-existed.pid"));
    assert!(pid_file.remove().is_ok());
}

#[test]
fn malformed_contents_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.pid");
    std::fs::write(&path, "not-a-pid").unwrap();
    let pid_file = PidFile::new(&path);
    assert!(matches!(pid_file.read(), Err(PidFileError::Malformed(_))));
}

#[test]
fn check_reports_absent_when_no_pid_file_exists() {
    let dir = tempdir().unwrap();
    let pid_file = PidFile::new(dir.path().join("default.pid"));
    assert_eq!(pid_file.check(&["anything".to_string()]).unwrap(), OwnershipCheck::Absent);
}

// S5 (spec §8): a pid file pointing at a live-but-unrelated process is
// treated as stale and removed.
#[test]
fn check_clears_a_stale_pid_file_owned_by_an_unrelated_process() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("default.pid");
    let pid_file = PidFile::new(&path);

    // pid 1 (init/launchd) is always alive but never matches our tokens.
    pid_file.write(1).unwrap();
    let result = pid_file.check(&["/nonexistent/project/root".to_string(), "ampad".to_string()]).unwrap();
    assert_eq!(result, OwnershipCheck::Stale(1));
    assert!(!path.exists());
}

#[test]
fn is_process_alive_is_true_for_own_pid() {
    assert!(is_process_alive(std::process::id()));
}

#[test]
fn is_owned_process_matches_against_its_own_cmdline() {
    // The test binary's own cmdline path contains the crate name under test.
    let pid = std::process::id();
    assert!(is_owned_process(pid, &["ampa".to_string()]));
}

#[test]
fn is_owned_process_is_false_for_an_unmatched_token() {
    let pid = std::process::id();
    assert!(!is_owned_process(pid, &["definitely-not-a-real-token-xyz".to_string()]));
}
