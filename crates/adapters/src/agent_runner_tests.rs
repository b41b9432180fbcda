// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

use super::*;

#[test]
fn render_invocation_substitutes_id_placeholder() {
    let template = vec!["opencode".to_string(), "run".to_string(), "/audit {id}".to_string()];
    let rendered = render_invocation(&template, "WL-abc123");
    assert_eq!(rendered, vec!["opencode", "run", "/audit WL-abc123"]);
}

#[test]
fn render_invocation_leaves_templates_without_placeholder_untouched() {
    let template = vec!["true".to_string()];
    assert_eq!(render_invocation(&template, "WL-x"), vec!["true".to_string()]);
}

#[tokio::test]
async fn fake_agent_runner_records_calls_and_returns_configured_response() {
    let runner = FakeAgentRunner::new().with_response("--- AUDIT REPORT START ---\nok", 0);
    let argv = vec!["opencode".to_string(), "run".to_string(), "/audit WL-1".to_string()];
    let out = runner.run(&argv).await.expect("fake run succeeds");

    assert_eq!(out.exit_code, Some(0));
    assert!(out.combined.contains("AUDIT REPORT START"));
    assert_eq!(runner.calls(), vec![argv]);
}
