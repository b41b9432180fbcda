// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! Parsed structured audit output (spec §3, §4.6).
//!
//! This module holds the value type only; the delimiter → sections →
//! table grammar is parsed in `ampa-engine::audit::report` (spec §9's
//! redesign note: model the grammar explicitly rather than ad-hoc regex).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Met,
    Unmet,
    Partial,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptanceCriterionStatus {
    pub n: u32,
    pub text: String,
    pub verdict: Verdict,
    pub evidence: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildStatus {
    pub id: String,
    pub title: String,
    pub status: String,
    pub stage: String,
    #[serde(default)]
    pub criteria: Vec<AcceptanceCriterionStatus>,
}

/// Parsed structured audit output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    pub summary: String,
    #[serde(default)]
    pub acceptance_criteria: Vec<AcceptanceCriterionStatus>,
    #[serde(default)]
    pub children: Vec<ChildStatus>,
    pub recommendation: String,
    pub closes_item: bool,
    pub pr_url: Option<String>,
    /// Optional `## Risks` section — supplemental, additive field; empty
    /// when the report doesn't carry one.
    #[serde(default)]
    pub risks: Vec<String>,
    pub raw_text: String,
}

#[cfg(test)]
#[path = "audit_report_tests.rs"]
mod tests;
