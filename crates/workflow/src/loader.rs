// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! Loads a [`WorkflowDescriptor`] from a `.yaml`/`.yml` or `.json` file.
//! Format is picked from the extension; the spec's original workflow
//! descriptor was YAML-only, JSON is a non-conflicting addition for
//! operators who'd rather generate the descriptor than hand-write it.

use crate::descriptor::WorkflowDescriptor;
use std::path::Path;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("workflow descriptor not found at {0}")]
    NotFound(std::path::PathBuf),

    #[error("failed to read workflow descriptor {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("workflow descriptor {path} has an unrecognized extension (expected .yaml, .yml, or .json)")]
    UnknownFormat { path: std::path::PathBuf },

    #[error("failed to parse workflow descriptor {path}: {source}")]
    Yaml {
        path: std::path::PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to parse workflow descriptor {path}: {source}")]
    Json {
        path: std::path::PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub fn load(path: impl AsRef<Path>) -> Result<WorkflowDescriptor, LoadError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let raw = std::fs::read_to_string(path)
        .map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;

    debug!(path = %path.display(), "loading workflow descriptor");
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&raw)
            .map_err(|source| LoadError::Yaml { path: path.to_path_buf(), source }),
        Some("json") => serde_json::from_str(&raw)
            .map_err(|source| LoadError::Json { path: path.to_path_buf(), source }),
        _ => Err(LoadError::UnknownFormat { path: path.to_path_buf() }),
    }
}

/// Probe `dir` for `workflow.yaml`, `workflow.yml`, then `workflow.json`,
/// in that order, and load the first one found.
pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<WorkflowDescriptor, LoadError> {
    let dir = dir.as_ref();
    for name in ["workflow.yaml", "workflow.yml", "workflow.json"] {
        let candidate = dir.join(name);
        if candidate.exists() {
            return load(candidate);
        }
    }
    Err(LoadError::NotFound(dir.join("workflow.yaml")))
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
