// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read store file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write store file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store file {path} contains malformed JSON: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("command {command_id} is already claimed in-flight by pid {pid}")]
    Busy { command_id: String, pid: u32 },
}

pub type StoreResult<T> = Result<T, StoreError>;
