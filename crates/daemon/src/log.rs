// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! Non-blocking, append-only file writer for `<name>.log` (spec §6:
//! "combined stdout+stderr, appended"). `ampa-cli` composes this with a
//! `tracing_subscriber::fmt` layer; this module only owns the sink.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// Build a non-blocking appending writer for `log_path`. The returned
/// `WorkerGuard` must be held for the lifetime of the process — dropping
/// it flushes and stops the background writer thread.
pub fn init_file_writer(log_path: &Path) -> std::io::Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let dir = log_path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = log_path.file_name().and_then(|n| n.to_str()).unwrap_or("daemon.log").to_string();
    std::fs::create_dir_all(dir)?;

    // `Rotation::NEVER` with a fixed file name gives us a single
    // appended file rather than `tracing-appender`'s usual
    // prefix-plus-date rolling behavior.
    let appender = RollingFileAppender::new(Rotation::NEVER, dir, file_name);
    Ok(tracing_appender::non_blocking(appender))
}
