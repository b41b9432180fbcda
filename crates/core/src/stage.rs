// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! Work item stage — the fine-grained workflow position.

use std::fmt;

/// Fine-grained workflow position of a work item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Idea,
    IntakeComplete,
    PlanComplete,
    InProgress,
    InReview,
    Delegated,
    Escalated,
    AuditFailed,
    AuditPassed,
    Done,
    Other(String),
}

impl Stage {
    pub fn as_str(&self) -> &str {
        match self {
            Stage::Idea => "idea",
            Stage::IntakeComplete => "intake_complete",
            Stage::PlanComplete => "plan_complete",
            Stage::InProgress => "in_progress",
            Stage::InReview => "in_review",
            Stage::Delegated => "delegated",
            Stage::Escalated => "escalated",
            Stage::AuditFailed => "audit_failed",
            Stage::AuditPassed => "audit_passed",
            Stage::Done => "done",
            Stage::Other(s) => s,
        }
    }

    fn parse(s: &str) -> Self {
        match s {
            "idea" => Stage::Idea,
            "intake_complete" => Stage::IntakeComplete,
            "plan_complete" => Stage::PlanComplete,
            "in_progress" => Stage::InProgress,
            "in_review" => Stage::InReview,
            "delegated" => Stage::Delegated,
            "escalated" => Stage::Escalated,
            "audit_failed" => Stage::AuditFailed,
            "audit_passed" => Stage::AuditPassed,
            "done" => Stage::Done,
            other => Stage::Other(other.to_string()),
        }
    }

    /// Delegation action implied by this stage, per the `idea → intake`,
    /// `intake_complete → plan`, `plan_complete → implement` mapping.
    pub fn delegation_action(&self) -> Option<&'static str> {
        match self {
            Stage::Idea => Some("intake"),
            Stage::IntakeComplete => Some("plan"),
            Stage::PlanComplete => Some("implement"),
            _ => None,
        }
    }

    /// Whether this stage is one of the three delegation-eligible stages.
    pub fn is_delegation_eligible(&self) -> bool {
        matches!(self, Stage::Idea | Stage::IntakeComplete | Stage::PlanComplete)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for Stage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for Stage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Stage::parse(&s))
    }
}

#[cfg(test)]
#[path = "stage_tests.rs"]
mod tests;
