// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! Persisted state layout under the project root (spec §6):
//!
//! ```text
//! .worklog/ampa/
//!   <name>/
//!     <name>.pid
//!     <name>.log
//!   scheduler_store.json
//! ```

use std::path::{Path, PathBuf};

/// Resolved filesystem layout for one named daemon instance.
#[derive(Debug, Clone)]
pub struct DaemonPaths {
    pub project_root: PathBuf,
    pub name: String,
    pub state_root: PathBuf,
    pub pid_path: PathBuf,
    pub log_path: PathBuf,
    pub store_path: PathBuf,
}

impl DaemonPaths {
    /// `store_path_override` corresponds to `AMPA_SCHEDULER_STORE` (spec §6).
    pub fn new(project_root: impl Into<PathBuf>, name: impl Into<String>, store_path_override: Option<PathBuf>) -> Self {
        let project_root = project_root.into();
        let name = name.into();
        let state_root = project_root.join(".worklog").join("ampa");
        let instance_dir = state_root.join(&name);
        let store_path = store_path_override.unwrap_or_else(|| state_root.join("scheduler_store.json"));

        Self {
            pid_path: instance_dir.join(format!("{name}.pid")),
            log_path: instance_dir.join(format!("{name}.log")),
            project_root,
            name,
            state_root,
            store_path,
        }
    }

    pub fn instance_dir(&self) -> PathBuf {
        self.state_root.join(&self.name)
    }

    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.instance_dir())?;
        if let Some(parent) = self.store_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Substrings an owned process's cmdline must contain at least one of
    /// for the pid-ownership predicate (spec §4.8).
    pub fn ownership_tokens(&self) -> Vec<String> {
        vec![
            self.project_root.to_string_lossy().into_owned(),
            "ampa.daemon".to_string(),
            "ampa.scheduler".to_string(),
            "ampad".to_string(),
        ]
    }
}

/// Helper for code that only has a raw path and needs the sibling `.tmp`
/// convention used elsewhere in the workspace (store writes, pid writes).
pub fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().and_then(|n| n.to_str()).unwrap_or("file").to_string();
    name.push_str(".tmp");
    path.with_file_name(name)
}
