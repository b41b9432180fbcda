// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

use super::*;
use std::collections::HashMap;

crate::define_id! {
    /// Test ID type for macro verification.
    pub struct TestId("tst-");
}

#[test]
fn define_id_round_trips_through_hash_map() {
    let id = TestId::new();
    let mut map = HashMap::new();
    map.insert(id, 42);
    assert_eq!(map.get(id.as_str()), Some(&42));
}

#[test]
fn define_id_has_type_prefix() {
    let id = TestId::new();
    assert!(id.as_str().starts_with("tst-"));
}

#[test]
fn define_id_from_string_round_trips() {
    let id = TestId::from_string("tst-abc123");
    assert_eq!(id.as_str(), "tst-abc123");
    assert_eq!(id.to_string(), "tst-abc123");
}

#[test]
fn define_id_default_generates_new() {
    let a = TestId::default();
    let b = TestId::default();
    assert_ne!(a.as_str(), b.as_str());
}

#[test]
fn idbuf_short_truncates() {
    assert_eq!(short("abcdefghijklmnop", 8), "abcdefgh");
    assert_eq!(short("abc", 8), "abc");
}

#[test]
fn idbuf_serde_round_trip() {
    let buf = IdBuf::new("hello-world");
    let json = serde_json::to_string(&buf).unwrap();
    assert_eq!(json, "\"hello-world\"");
    let back: IdBuf = serde_json::from_str(&json).unwrap();
    assert_eq!(back.as_str(), "hello-world");
}
