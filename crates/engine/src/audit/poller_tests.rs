// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

use super::*;
use ampa_adapters::FakeWorklog;
use ampa_core::{FakeClock, Stage, WorkItem};
use chrono::Duration;
use tempfile::tempdir;

fn store() -> SchedulerStore {
    let dir = tempdir().expect("tempdir");
    SchedulerStore::load(dir.path().join("store.json")).expect("load empty store")
}

#[tokio::test]
async fn selects_oldest_candidate_by_updated_at() {
    let clock = FakeClock::new();
    let older = WorkItem::builder()
        .id("WL-OLD")
        .stage(Stage::InReview)
        .updated_at(clock.now_utc())
        .build();
    clock.advance(Duration::hours(1));
    let newer = WorkItem::builder()
        .id("WL-NEW")
        .stage(Stage::InReview)
        .updated_at(clock.now_utc())
        .build();

    let worklog = FakeWorklog::with_items(vec![newer, older.clone()]);
    let store = store();

    let selected = select_and_claim(&worklog, &store, &clock, 6).await.expect("ok").expect("some candidate");
    assert_eq!(selected.id, older.id);
}

#[tokio::test]
async fn cooldown_filters_out_recently_audited_items() {
    let clock = FakeClock::new();
    let item = WorkItem::builder().id("WL-Y").stage(Stage::InReview).updated_at(clock.now_utc()).build();
    let worklog = FakeWorklog::with_items(vec![item]);
    let store = store();

    store.set_last_audit("WL-Y", clock.now_utc());
    clock.advance(Duration::hours(3));

    let selected = select_and_claim(&worklog, &store, &clock, 6).await.expect("ok");
    assert!(selected.is_none());
}

#[tokio::test]
async fn claims_the_cooldown_before_returning_the_candidate() {
    let clock = FakeClock::new();
    let item = WorkItem::builder().id("WL-Z").stage(Stage::InReview).build();
    let worklog = FakeWorklog::with_items(vec![item]);
    let store = store();

    select_and_claim(&worklog, &store, &clock, 6).await.expect("ok").expect("candidate");
    assert_eq!(store.get_last_audit("WL-Z"), Some(clock.now_utc()));
}

#[tokio::test]
async fn empty_in_review_list_yields_none() {
    let clock = FakeClock::new();
    let worklog = FakeWorklog::with_items(vec![]);
    let store = store();
    assert!(select_and_claim(&worklog, &store, &clock, 6).await.expect("ok").is_none());
}
