// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! Persistent configuration for a recurring scheduled job.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// Operator-chosen identifier for a [`ScheduledCommand`] (e.g. `"triage-audit"`).
///
/// Unlike [`crate::id`]'s generated ids, this wraps a user-supplied slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandId(pub String);

impl CommandId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CommandId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CommandId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The closed set of built-in command types, plus an operator-defined
/// escape hatch for anything else.
///
/// Dispatch priority is `TriageAudit > Delegation > Custom` (spec §4.2
/// step 3); [`CommandType::dispatch_priority`] encodes that ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandType {
    TriageAudit,
    Delegation,
    Custom,
}

impl CommandType {
    pub fn dispatch_priority(&self) -> u8 {
        match self {
            CommandType::TriageAudit => 0,
            CommandType::Delegation => 1,
            CommandType::Custom => 2,
        }
    }
}

crate::simple_display! {
    CommandType {
        TriageAudit => "triage-audit",
        Delegation => "delegation",
        Custom => "custom",
    }
}

/// Persistent config for a recurring job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledCommand {
    pub command_id: CommandId,
    pub command_type: CommandType,
    #[serde(with = "duration_secs")]
    pub interval: Duration,
    /// Argv template for the agent runner; may contain `{id}` placeholders.
    #[serde(default)]
    pub invocation: Vec<String>,
    /// Free-form metadata, typed per command_type (spec §4.2/§4.7/§6).
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl ScheduledCommand {
    pub fn audit_cooldown_hours(&self) -> i64 {
        self.metadata
            .get("audit_cooldown_hours")
            .and_then(Value::as_i64)
            .unwrap_or(6)
    }

    pub fn truncate_chars(&self) -> usize {
        self.metadata
            .get("truncate_chars")
            .and_then(Value::as_u64)
            .map(|v| v as usize)
            .unwrap_or(65536)
    }

    pub fn verify_pr_with_gh(&self, env_override: Option<bool>) -> bool {
        if let Some(v) = env_override {
            return v;
        }
        self.metadata.get("verify_pr_with_gh").and_then(Value::as_bool).unwrap_or(true)
    }

    pub fn audit_only(&self) -> bool {
        self.metadata.get("audit_only").and_then(Value::as_bool).unwrap_or(false)
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(d)?;
        Ok(Duration::from_secs(secs))
    }
}

#[cfg(test)]
#[path = "scheduled_command_tests.rs"]
mod tests;
