// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

use super::*;
use chrono::Duration as ChronoDuration;

#[test]
fn system_clock_returns_increasing_time() {
    let clock = SystemClock;
    let t1 = clock.now();
    std::thread::sleep(std::time::Duration::from_millis(1));
    let t2 = clock.now();
    assert!(t2 > t1);
}

#[test]
fn system_clock_now_utc_is_recent() {
    let clock = SystemClock;
    let now = clock.now_utc();
    assert!(now.timestamp() > 1_700_000_000);
}

#[test]
fn fake_clock_can_be_advanced() {
    let clock = FakeClock::new();
    let t1 = clock.now_utc();
    clock.advance(ChronoDuration::hours(6));
    let t2 = clock.now_utc();
    assert_eq!(t2 - t1, ChronoDuration::hours(6));
}

#[test]
fn fake_clock_is_cloneable_and_shared() {
    let clock1 = FakeClock::new();
    let clock2 = clock1.clone();
    let t1 = clock1.now_utc();
    clock2.advance(ChronoDuration::minutes(30));
    let t2 = clock1.now_utc();
    assert_eq!(t2 - t1, ChronoDuration::minutes(30));
}

#[test]
fn fake_clock_default_starts_at_epoch() {
    let clock = FakeClock::default();
    assert_eq!(clock.now_utc(), DateTime::<Utc>::UNIX_EPOCH);
}

#[test]
fn fake_clock_set_utc() {
    let clock = FakeClock::new();
    let target = DateTime::<Utc>::UNIX_EPOCH + ChronoDuration::days(365);
    clock.set_utc(target);
    assert_eq!(clock.now_utc(), target);
}
