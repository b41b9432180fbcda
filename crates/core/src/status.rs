// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! Work item status — the coarse lifecycle bucket.

use std::fmt;

/// Coarse lifecycle bucket for a work item.
///
/// `Other` absorbs any value the worklog CLI emits that this daemon
/// doesn't recognize yet, so an evolving worklog schema deserializes
/// instead of failing the whole record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Open,
    InProgress,
    Blocked,
    Completed,
    Closed,
    Other(String),
}

impl Status {
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Status::InProgress)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Status::Open => "open",
            Status::InProgress => "in_progress",
            Status::Blocked => "blocked",
            Status::Completed => "completed",
            Status::Closed => "closed",
            Status::Other(s) => s,
        }
    }

    fn parse(s: &str) -> Self {
        match s {
            "open" => Status::Open,
            "in_progress" => Status::InProgress,
            "blocked" => Status::Blocked,
            "completed" => Status::Completed,
            "closed" => Status::Closed,
            other => Status::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for Status {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for Status {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Status::parse(&s))
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
