// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! Clock abstraction for testable time handling.
//!
//! Two notions of time are exposed: [`Clock::now`] is monotonic
//! (`Instant`), used for process-local timeouts like the shutdown grace
//! window; [`Clock::now_utc`] is wall-clock (`DateTime<Utc>`), used for
//! everything persisted to the store (`last_run_at`,
//! `last_audit_at_by_item`) since those values must survive a restart
//! and be compared across runs.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;

/// A clock that provides the current time.
pub trait Clock: Clone + Send + Sync {
    fn now(&self) -> Instant;
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Real system clock.
#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fake clock for testing with controllable time.
#[derive(Clone)]
pub struct FakeClock {
    current: Arc<Mutex<Instant>>,
    utc: Arc<Mutex<DateTime<Utc>>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            current: Arc::new(Mutex::new(Instant::now())),
            utc: Arc::new(Mutex::new(DateTime::<Utc>::UNIX_EPOCH)),
        }
    }

    /// Advance the clock by the given duration.
    pub fn advance(&self, duration: chrono::Duration) {
        if let Ok(std_duration) = duration.to_std() {
            *self.current.lock() += std_duration;
        }
        *self.utc.lock() += duration;
    }

    /// Set the wall-clock time to a specific instant.
    pub fn set_utc(&self, at: DateTime<Utc>) {
        *self.utc.lock() = at;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        *self.current.lock()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        *self.utc.lock()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
