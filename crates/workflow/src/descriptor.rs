// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! The workflow descriptor: the authoritative state machine definition
//! loaded once at daemon start (spec §3, §4.3).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateAlias {
    pub status: String,
    pub stage: String,
}

/// Allowed values of [`InvariantDecl::when`]. Kept as a raw string rather
/// than an enum so a descriptor with a bad value *loads* (the validator's
/// V-S family is the thing that reports it as an ERROR, per spec §4.3 —
/// an enum would instead fail at parse time with a less specific error).
pub const ALLOWED_INVARIANT_WHEN: [&str; 3] = ["pre", "post", "both"];

/// Allowed values of [`InputDecl::input_type`]. See the note on
/// `ALLOWED_INVARIANT_WHEN` for why this is a string, not an enum.
pub const ALLOWED_INPUT_TYPES: [&str; 5] = ["string", "number", "boolean", "array", "object"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvariantDecl {
    pub name: String,
    pub when: String,
    pub expression: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDecl {
    #[serde(rename = "type")]
    pub input_type: String,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effects {
    #[serde(default)]
    pub set_assignee: Option<String>,
    #[serde(default)]
    pub add_tags: Vec<String>,
    #[serde(default)]
    pub remove_tags: Vec<String>,
    #[serde(default)]
    pub set_needs_producer_review: Option<bool>,
    #[serde(default)]
    pub notifications: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDecl {
    pub from: Vec<String>,
    pub to: String,
    pub actor: String,
    /// Required by V-S; not part of the core `{from, to, actor, ...}`
    /// tuple in §3's data model, but §4.3's schema check treats it as
    /// mandatory, so it is captured here rather than silently dropped.
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub pre: Vec<String>,
    #[serde(default)]
    pub post: Vec<String>,
    #[serde(default)]
    pub inputs: IndexMap<String, InputDecl>,
    #[serde(default)]
    pub effects: Effects,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub roles: Vec<String>,
}

/// The loaded, not-yet-validated descriptor. Validity is established
/// separately by [`crate::validator::validate`]; this type only encodes
/// shape, not semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowDescriptor {
    pub version: String,
    #[serde(default)]
    pub status: Vec<String>,
    #[serde(default)]
    pub stage: Vec<String>,
    #[serde(default)]
    pub states: IndexMap<String, StateAlias>,
    #[serde(default)]
    pub terminal_states: Vec<String>,
    #[serde(default)]
    pub invariants: Vec<InvariantDecl>,
    #[serde(default)]
    pub commands: IndexMap<String, CommandDecl>,
    #[serde(default)]
    pub metadata: Metadata,

    /// Captures any top-level key not named above, so V-S08 ("no unknown
    /// top-level keys") has something to check against.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl WorkflowDescriptor {
    pub fn command(&self, name: &str) -> Option<&CommandDecl> {
        self.commands.get(name)
    }

    pub fn invariant(&self, name: &str) -> Option<&InvariantDecl> {
        self.invariants.iter().find(|i| i.name == name)
    }

    pub fn is_terminal(&self, alias: &str) -> bool {
        self.terminal_states.iter().any(|t| t == alias)
    }
}

#[cfg(test)]
#[path = "descriptor_tests.rs"]
mod tests;
