// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

use super::*;

#[test]
fn default_report_is_empty_and_does_not_close() {
    let report = AuditReport::default();
    assert!(!report.closes_item);
    assert!(report.acceptance_criteria.is_empty());
    assert!(report.children.is_empty());
    assert!(report.risks.is_empty());
}

#[test]
fn round_trips_through_json() {
    let report = AuditReport {
        summary: "Looks done.".to_string(),
        acceptance_criteria: vec![AcceptanceCriterionStatus {
            n: 1,
            text: "Handles empty input".to_string(),
            verdict: Verdict::Met,
            evidence: "see test_empty_input".to_string(),
        }],
        children: vec![ChildStatus {
            id: "WL-1".to_string(),
            title: "child".to_string(),
            status: "completed".to_string(),
            stage: "done".to_string(),
            criteria: Vec::new(),
        }],
        recommendation: "Close it.".to_string(),
        closes_item: true,
        pr_url: Some("https://github.com/org/repo/pull/42".to_string()),
        risks: vec!["flaky CI on windows".to_string()],
        raw_text: "raw".to_string(),
    };
    let json = serde_json::to_string(&report).unwrap();
    let back: AuditReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
}
