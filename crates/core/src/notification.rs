// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! Outbound chat notification, shaped to mirror the Discord-webhook
//! embed schema (spec §6).

use serde::{Deserialize, Serialize};

/// Body is truncated to this many bytes (spec §3, §6).
pub const NOTIFICATION_BODY_LIMIT: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl NotificationField {
    pub fn new(name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        Self { name: name.into(), value: value.into(), inline }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub channel: String,
    pub title: String,
    pub fields: Vec<NotificationField>,
    pub body: String,
    pub severity: Severity,
}

impl Notification {
    pub fn new(channel: impl Into<String>, title: impl Into<String>, severity: Severity) -> Self {
        Self {
            channel: channel.into(),
            title: title.into(),
            fields: Vec::new(),
            body: String::new(),
            severity,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = truncate_bytes(&body.into(), NOTIFICATION_BODY_LIMIT);
        self
    }

    pub fn with_field(mut self, field: NotificationField) -> Self {
        self.fields.push(field);
        self
    }
}

/// Truncate a string to at most `limit` bytes without splitting a UTF-8
/// char boundary.
pub fn truncate_bytes(s: &str, limit: usize) -> String {
    if s.len() <= limit {
        return s.to_string();
    }
    let mut end = limit;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &s[..end])
}

#[cfg(test)]
#[path = "notification_tests.rs"]
mod tests;
