// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! Property: saving then loading a store document is lossless for any
//! combination of last-run timestamps and audit cooldown timestamps
//! (spec §8, testable property #4).

use crate::store::SchedulerStore;
use ampa_core::{CommandId, CommandType, ScheduledCommand};
use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use std::collections::HashMap;
use std::time::Duration;
use tempfile::tempdir;

fn arb_timestamp() -> impl Strategy<Value = chrono::DateTime<Utc>> {
    (0i64..2_000_000_000).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

proptest! {
    #[test]
    fn save_load_round_trip_preserves_last_run_and_audit_times(
        command_id in "[a-z][a-z0-9-]{0,15}",
        item_id in "[A-Z]{2}-[0-9]{1,4}",
        run_at in arb_timestamp(),
        audit_at in arb_timestamp(),
    ) {
        let dir = tempdir().unwrap();
        let store = SchedulerStore::load(dir.path().join("store.json")).unwrap();
        store.set_commands(vec![ScheduledCommand {
            command_id: CommandId::new(command_id.clone()),
            command_type: CommandType::Custom,
            interval: Duration::from_secs(300),
            invocation: Vec::new(),
            metadata: HashMap::new(),
        }]);
        store.set_last_run_at(&command_id, run_at);
        store.set_last_audit(&item_id, audit_at);
        store.save().unwrap();

        let reloaded = SchedulerStore::load(dir.path().join("store.json")).unwrap();
        prop_assert_eq!(reloaded.last_run_at(&command_id), Some(run_at));
        prop_assert_eq!(reloaded.get_last_audit(&item_id), Some(audit_at));
    }
}
