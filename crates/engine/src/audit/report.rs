// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! The audit-report grammar: delimiter pair → `##` sections → markdown
//! tables (spec §4.6, §9 redesign note — modeled explicitly rather than
//! an ad-hoc regex pulling the summary out of raw text).

use ampa_core::{AcceptanceCriterionStatus, AuditReport, ChildStatus, Verdict};
use indexmap::IndexMap;
use regex::Regex;
use std::sync::OnceLock;
use tracing::warn;

const DELIM_START: &str = "--- AUDIT REPORT START ---";
const DELIM_END: &str = "--- AUDIT REPORT END ---";

#[allow(clippy::expect_used)]
fn pr_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"https?://[^ )]+/pull/\d+").expect("static regex is valid"))
}

/// Slice the delimiter-bounded body out of the full captured agent
/// output. Falls back to the entire string (and logs a warning) when
/// either marker is missing, per spec §4.6 step 1 / §8 scenario S4.
fn extract_body(raw: &str) -> String {
    if let (Some(start), Some(end)) = (raw.find(DELIM_START), raw.find(DELIM_END)) {
        if end > start {
            return raw[start + DELIM_START.len()..end].trim().to_string();
        }
    }
    warn!("audit report delimiters not found, falling back to raw captured output");
    raw.trim().to_string()
}

/// Split a body into its top-level `## ` sections, preserving order.
fn sections(body: &str) -> IndexMap<String, String> {
    let mut map = IndexMap::new();
    let mut current: Option<String> = None;
    let mut buf = String::new();
    for line in body.lines() {
        if let Some(title) = line.strip_prefix("## ") {
            if let Some(name) = current.take() {
                map.insert(name, buf.trim().to_string());
            }
            current = Some(title.trim().to_string());
            buf.clear();
        } else if current.is_some() {
            buf.push_str(line);
            buf.push('\n');
        }
    }
    if let Some(name) = current {
        map.insert(name, buf.trim().to_string());
    }
    map
}

/// Rows of a markdown table: every line starting with `|`, split into
/// trimmed cells. The header and separator rows are filtered out by
/// callers (they fail to parse as data), not here.
fn table_rows(body: &str) -> Vec<Vec<String>> {
    body.lines()
        .filter(|l| l.trim_start().starts_with('|'))
        .map(|l| l.trim().trim_matches('|').split('|').map(|c| c.trim().to_string()).collect())
        .collect()
}

fn parse_criteria(body: &str) -> Vec<AcceptanceCriterionStatus> {
    table_rows(body)
        .into_iter()
        .filter_map(|cells| {
            if cells.len() < 4 {
                return None;
            }
            let n: u32 = cells[0].parse().ok()?;
            let verdict = match cells[2].to_lowercase().as_str() {
                "met" => Verdict::Met,
                "unmet" => Verdict::Unmet,
                "partial" => Verdict::Partial,
                _ => return None,
            };
            Some(AcceptanceCriterionStatus {
                n,
                text: cells[1].clone(),
                verdict,
                evidence: cells[3].clone(),
            })
        })
        .collect()
}

/// `### <id> | <title> | <status> | <stage>` subsections within
/// `## Children Status`, each followed by its own criteria table.
fn parse_children(body: &str) -> Vec<ChildStatus> {
    let mut children = Vec::new();
    let mut current: Option<(String, String, String, String)> = None;
    let mut table_buf = String::new();

    let flush = |current: &mut Option<(String, String, String, String)>, table_buf: &mut String, out: &mut Vec<ChildStatus>| {
        if let Some((id, title, status, stage)) = current.take() {
            out.push(ChildStatus { id, title, status, stage, criteria: parse_criteria(table_buf) });
        }
        table_buf.clear();
    };

    for line in body.lines() {
        if let Some(rest) = line.strip_prefix("### ") {
            flush(&mut current, &mut table_buf, &mut children);
            let parts: Vec<&str> = rest.split('|').map(str::trim).collect();
            current = Some((
                parts.first().copied().unwrap_or_default().to_string(),
                parts.get(1).copied().unwrap_or_default().to_string(),
                parts.get(2).copied().unwrap_or_default().to_string(),
                parts.get(3).copied().unwrap_or_default().to_string(),
            ));
        } else {
            table_buf.push_str(line);
            table_buf.push('\n');
        }
    }
    flush(&mut current, &mut table_buf, &mut children);
    children
}

fn parse_risks(body: &str) -> Vec<String> {
    body.lines()
        .filter_map(|l| {
            let trimmed = l.trim_start();
            trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("* "))
        })
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn contains_closure_token(text: &str, positive: bool) -> bool {
    let needle =
        if positive { "can this item be closed? yes" } else { "can this item be closed? no" };
    text.to_lowercase().contains(needle)
}

/// Parse the raw captured agent output into a structured [`AuditReport`]
/// (spec §3, §4.6). Never fails: a report missing every expected
/// section still yields an `AuditReport` with empty fields and the full
/// raw text preserved in `raw_text`.
pub fn parse(raw_captured_output: &str) -> AuditReport {
    let body = extract_body(raw_captured_output);
    let secs = sections(&body);

    let summary = secs.get("Summary").cloned().unwrap_or_default();
    let acceptance_criteria = secs
        .get("Acceptance Criteria Status")
        .map(|s| parse_criteria(s))
        .unwrap_or_default();
    let children = secs.get("Children Status").map(|s| parse_children(s)).unwrap_or_default();
    let recommendation = secs.get("Recommendation").cloned().unwrap_or_default();
    let risks = secs.get("Risks").map(|s| parse_risks(s)).unwrap_or_default();

    let closes_item = contains_closure_token(&body, true);
    let pr_url = pr_url_re().find(raw_captured_output).map(|m| m.as_str().to_string());

    AuditReport {
        summary,
        acceptance_criteria,
        children,
        recommendation,
        closes_item,
        pr_url,
        risks,
        raw_text: body,
    }
}

/// Whether `raw_captured_output` carries the `--- AUDIT REPORT START/END ---`
/// delimiter pair, for callers that need to distinguish "parsed the
/// canonical body" from "fell back to the whole string" without
/// re-running the parser (spec §8 scenario S4).
pub fn has_delimiters(raw_captured_output: &str) -> bool {
    match (raw_captured_output.find(DELIM_START), raw_captured_output.find(DELIM_END)) {
        (Some(s), Some(e)) => e > s,
        _ => false,
    }
}

/// First non-empty paragraph of the `## Summary` section, used as the
/// Discord fallback when [`parse`]'s `summary` field is blank (spec §4.6
/// step 3, §8 scenario S4).
pub fn first_summary_paragraph(raw_captured_output: &str) -> Option<String> {
    let body = extract_body(raw_captured_output);
    let summary_section = sections(&body).get("Summary").cloned()?;
    summary_section.split("\n\n").map(str::trim).find(|p| !p.is_empty()).map(str::to_string)
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
