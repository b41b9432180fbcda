// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ampa-engine: the scheduler loop, the audit poller/runner, the
//! delegation engine, and the invariant evaluator (spec §4.2, §4.4-§4.7).
//!
//! Nothing here performs I/O directly; everything is driven through the
//! `ampa-adapters` capability traits and the `ampa-store` document.

pub mod audit;
pub mod delegation;
pub mod invariant;
pub mod scheduler;

pub use invariant::{evaluate, evaluate_all, AdmissionReport, InvariantContext, InvariantResult};
pub use scheduler::{SchedulerDeps, TickOutcome, DEFAULT_TICK, SHUTDOWN_GRACE};
