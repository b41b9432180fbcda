// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ampa-daemon: the process supervisor (spec §4.8) — pid file
//! lifecycle, project-ownership validation, the non-blocking log
//! writer, and the signal-aware scheduler loop driver.
//!
//! `ampa-cli` owns `Config` assembly and the clap surface; everything
//! here is driven explicitly by arguments, never by reading `std::env`
//! itself (spec §9 "module-level env-var reading" redesign note).

pub mod log;
pub mod paths;
pub mod pid;
pub mod supervisor;

pub use log::init_file_writer;
pub use paths::DaemonPaths;
pub use pid::{is_owned_process, is_process_alive, signal, OwnershipCheck, PidFile, PidFileError};
pub use supervisor::{run_supervisor, DescriptorHandle, SupervisorConfig, SupervisorOutcome};
