// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! The invariant evaluator (spec §4.4): the ten canonical named
//! predicates, each a pure function of a work item plus backlog
//! context. Evaluation never short-circuits — the admission API
//! surfaces every failed precondition in one report (spec §8, T-IE-06).

use ampa_core::WorkItem;
use regex::Regex;
use std::sync::OnceLock;

/// Everything an invariant predicate may read.
pub struct InvariantContext<'a> {
    pub item: &'a WorkItem,
    pub backlog: &'a [WorkItem],
}

impl<'a> InvariantContext<'a> {
    pub fn new(item: &'a WorkItem, backlog: &'a [WorkItem]) -> Self {
        Self { item, backlog }
    }
}

/// The outcome of evaluating one named invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantResult {
    pub name: String,
    pub ok: bool,
    pub detail: String,
}

/// Aggregate admission result for a candidate against a full `pre[]` list
/// (spec §4.7 step 3, §8 T-IE-06: collect all failures, not just the first).
#[derive(Debug, Clone, Default)]
pub struct AdmissionReport {
    pub results: Vec<InvariantResult>,
}

impl AdmissionReport {
    pub fn admitted(&self) -> bool {
        self.results.iter().all(|r| r.ok)
    }

    pub fn failures(&self) -> impl Iterator<Item = &InvariantResult> {
        self.results.iter().filter(|r| !r.ok)
    }
}

#[allow(clippy::expect_used)]
fn acceptance_criteria_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)acceptance criteria|- \[[ xX]\]").expect("static regex is valid")
    })
}

#[allow(clippy::expect_used)]
fn approved_by_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^Approved by \w+").expect("static regex is valid"))
}

#[allow(clippy::expect_used)]
fn test_reference_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)##\s*tests?(ing)?\b|https?://\S*test\S*").expect("static regex is valid")
    })
}

fn closure_token(body: &str, positive: bool) -> bool {
    let needle =
        if positive { "can this item be closed? yes" } else { "can this item be closed? no" };
    body.to_lowercase().contains(needle)
}

/// Evaluate a single named invariant against `ctx`. An unrecognized name
/// fails closed (`ok: false`) rather than panicking — the workflow
/// validator (V-I01) is responsible for rejecting descriptors that
/// reference unknown invariant names before the engine ever runs.
pub fn evaluate(name: &str, ctx: &InvariantContext) -> InvariantResult {
    let (ok, detail) = match name {
        "requires_work_item_context" => {
            let len = ctx.item.description_length();
            (len > 100, format!("description length {len} (need > 100)"))
        }
        "requires_acceptance_criteria" => {
            let ok = acceptance_criteria_re().is_match(&ctx.item.description);
            (ok, "description lacks an 'Acceptance Criteria' section or checklist".to_string())
        }
        "requires_stage_for_delegation" => {
            let ok = ctx.item.stage.is_delegation_eligible();
            (ok, format!("stage {:?} is not delegation-eligible", ctx.item.stage.as_str()))
        }
        "not_do_not_delegate" => {
            let tags = ctx.item.tags_lower();
            let tagged = tags.iter().any(|t| t == "do-not-delegate" || t == "do_not_delegate");
            let flagged = ctx.item.metadata_flag("do_not_delegate") || ctx.item.metadata_flag("no_delegation");
            (!tagged && !flagged, "item is tagged or flagged do-not-delegate".to_string())
        }
        "no_in_progress_items" => {
            let blockers: Vec<&str> = ctx
                .backlog
                .iter()
                .filter(|w| w.status.is_in_progress() && w.id != ctx.item.id)
                .map(|w| w.id.as_str())
                .collect();
            let ok = blockers.is_empty();
            (ok, format!("in-progress items block admission: {}", blockers.join(", ")))
        }
        "requires_audit_result" => {
            let ok = ctx.item.latest_comment().is_some_and(|c| c.is_audit_result());
            (ok, "most recent comment is not an AMPA Audit Result".to_string())
        }
        "audit_recommends_closure" => {
            let ok = ctx
                .item
                .latest_audit_comment()
                .is_some_and(|c| closure_token(&c.body, true));
            (ok, "latest AMPA audit comment does not recommend closure".to_string())
        }
        "audit_does_not_recommend_closure" => {
            let ok = ctx
                .item
                .latest_audit_comment()
                .is_some_and(|c| closure_token(&c.body, false));
            (ok, "latest AMPA audit comment does not reject closure".to_string())
        }
        "requires_approvals" => {
            let ok = ctx.item.comments.iter().any(|c| approved_by_re().is_match(&c.body));
            (ok, "no comment of form 'Approved by <Role>' found".to_string())
        }
        "requires_tests" => {
            let ok = test_reference_re().is_match(&ctx.item.description);
            (ok, "description has no test plan link or '## Testing'/'## Tests' section".to_string())
        }
        other => (false, format!("unknown invariant {other:?}")),
    };

    InvariantResult { name: name.to_string(), ok, detail }
}

/// Evaluate every name in `names` against `ctx`, never short-circuiting.
pub fn evaluate_all(names: &[String], ctx: &InvariantContext) -> AdmissionReport {
    AdmissionReport { results: names.iter().map(|n| evaluate(n, ctx)).collect() }
}

#[cfg(test)]
#[path = "invariant_tests.rs"]
mod tests;
