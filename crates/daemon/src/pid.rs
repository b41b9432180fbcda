// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! Pid file lifecycle and the project-ownership predicate (spec §4.8):
//! "before honoring a pid file, read the target's command-line ... and
//! require it to contain the project root path OR a known module
//! token ... A mismatch triggers stale-pid-file removal."

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum PidFileError {
    #[error("failed to read pid file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write pid file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("pid file {0} contains no valid pid")]
    Malformed(PathBuf),
}

/// Outcome of validating a pid file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnershipCheck {
    /// No pid file present.
    Absent,
    /// A live process owns the pid, per the ownership predicate.
    Owned(u32),
    /// The pid file is stale: either the pid is dead, or it's alive but
    /// owned by an unrelated process (classic PID-reuse scenario, spec
    /// §8 T-6 / §8 S5).
    Stale(u32),
}

/// A pid file at a known path. Doesn't hold the file open — callers are
/// expected to hold an `fs2` advisory lock separately if cross-process
/// mutual exclusion on *acquiring* ownership is required; this type
/// only encodes the read/write/remove mechanics spec §4.8 describes.
#[derive(Debug, Clone)]
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, pid: u32) -> Result<(), PidFileError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|source| PidFileError::Write { path: self.path.clone(), source })?;
        }
        std::fs::write(&self.path, pid.to_string())
            .map_err(|source| PidFileError::Write { path: self.path.clone(), source })
    }

    pub fn read(&self) -> Result<Option<u32>, PidFileError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => content
                .trim()
                .parse::<u32>()
                .map(Some)
                .map_err(|_| PidFileError::Malformed(self.path.clone())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PidFileError::Read { path: self.path.clone(), source }),
        }
    }

    pub fn remove(&self) -> Result<(), PidFileError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PidFileError::Write { path: self.path.clone(), source }),
        }
    }

    /// Validate a pid file against the ownership predicate, removing it
    /// if stale (spec §4.8, §8 S5: "a `start` invocation against a stale
    /// pid file ... removes the pid file and starts a new daemon").
    pub fn check(&self, ownership_tokens: &[String]) -> Result<OwnershipCheck, PidFileError> {
        let Some(pid) = self.read()? else {
            return Ok(OwnershipCheck::Absent);
        };

        if is_process_alive(pid) && is_owned_process(pid, ownership_tokens) {
            return Ok(OwnershipCheck::Owned(pid));
        }

        self.remove()?;
        Ok(OwnershipCheck::Stale(pid))
    }
}

/// Whether `pid` refers to a live process, via a signal-0 probe.
pub fn is_process_alive(pid: u32) -> bool {
    kill(Pid::from_raw(pid as i32), None).is_ok()
}

/// Whether `pid`'s command line contains the project root path or a
/// known module token (spec §4.8's "key robustness property against
/// PID reuse").
pub fn is_owned_process(pid: u32, ownership_tokens: &[String]) -> bool {
    match read_cmdline(pid) {
        Some(cmdline) => ownership_tokens.iter().any(|token| !token.is_empty() && cmdline.contains(token)),
        None => false,
    }
}

#[cfg(target_os = "linux")]
fn read_cmdline(pid: u32) -> Option<String> {
    let raw = std::fs::read(format!("/proc/{pid}/cmdline")).ok()?;
    Some(raw.split(|b| *b == 0).filter(|s| !s.is_empty()).map(String::from_utf8_lossy).collect::<Vec<_>>().join(" "))
}

/// Non-Linux fallback: shells out to `ps`, matching the spec's "via
/// /proc on Linux or `ps` elsewhere" instruction.
#[cfg(not(target_os = "linux"))]
fn read_cmdline(pid: u32) -> Option<String> {
    let output = std::process::Command::new("ps").args(["-o", "command=", "-p", &pid.to_string()]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Send `signal` to `pid`, treating "no such process" as success (the
/// caller's intent — a dead process is already stopped).
pub fn signal(pid: u32, signal: Signal) -> std::io::Result<()> {
    match kill(Pid::from_raw(pid as i32), signal) {
        Ok(()) => Ok(()),
        Err(nix::errno::Errno::ESRCH) => Ok(()),
        Err(e) => Err(std::io::Error::from_raw_os_error(e as i32)),
    }
}

#[cfg(test)]
#[path = "pid_tests.rs"]
mod tests;
