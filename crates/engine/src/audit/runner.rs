// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! The audit runner (spec §4.6): spawns the audit agent, extracts and
//! parses the structured report, notifies, posts a worklog comment, and
//! gates auto-completion.

use crate::audit::report;
use ampa_adapters::{
    render_invocation, AgentRunner, GithubCli, Notifier, WorkItemUpdate, Worklog,
};
use ampa_core::{
    AuditReport, Notification, NotificationField, ScheduledCommand, Severity, WorkItem,
};
use std::path::PathBuf;
use tracing::{info, warn};

/// Everything the audit runner needs about the surrounding project, kept
/// separate from the per-tick [`ScheduledCommand`] so it can be shared
/// across both built-in handlers.
#[derive(Debug, Clone, Default)]
pub struct AuditRunnerConfig {
    pub notify_channel: String,
    pub github_repo: Option<String>,
    /// Overrides the command's `verify_pr_with_gh` metadata flag when set
    /// (spec §6 `AMPA_VERIFY_PR_WITH_GH`).
    pub verify_pr_with_gh_env: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct AuditOutcome {
    pub report: AuditReport,
    pub exit_code: Option<i32>,
    pub auto_completed: bool,
}

/// Runs one audit cycle against `item`, per spec §4.6 steps 1–5.
pub async fn run(
    agent_runner: &dyn AgentRunner,
    worklog: &dyn Worklog,
    notifier: &dyn Notifier,
    github: &dyn GithubCli,
    item: &WorkItem,
    command: &ScheduledCommand,
    config: &AuditRunnerConfig,
) -> AuditOutcome {
    let argv = render_invocation(&command.invocation, item.id.as_str());
    let captured = match agent_runner.run(&argv).await {
        Ok(out) => out,
        Err(e) => {
            warn!(item_id = %item.id, error = %e, "audit agent failed to spawn");
            ampa_adapters::AgentRunOutput::default()
        }
    };

    let parsed = report::parse(&captured.combined);
    if !report::has_delimiters(&captured.combined) {
        warn!(item_id = %item.id, "audit output missing delimiters, used raw text as report body");
    }

    notify(notifier, &parsed, &captured, item, config).await;
    post_comment(worklog, &parsed, item, command).await;

    let auto_completed =
        maybe_auto_complete(worklog, github, &parsed, &captured, item, command, config.verify_pr_with_gh_env).await;

    AuditOutcome { report: parsed, exit_code: captured.exit_code, auto_completed }
}

async fn notify(
    notifier: &dyn Notifier,
    parsed: &AuditReport,
    captured: &ampa_adapters::AgentRunOutput,
    item: &WorkItem,
    config: &AuditRunnerConfig,
) {
    let summary = if !parsed.summary.trim().is_empty() {
        parsed.summary.clone()
    } else if let Some(p) = report::first_summary_paragraph(&captured.combined) {
        p
    } else {
        format!("audit exited with code {}", captured.exit_code.map_or("unknown".to_string(), |c| c.to_string()))
    };

    let mut notification = Notification::new(&config.notify_channel, "AMPA Audit Result", Severity::Info)
        .with_body(summary)
        .with_field(NotificationField::new("Item", item.id.as_str(), true));

    if let Some(pr_url) = &parsed.pr_url {
        notification = notification.with_field(NotificationField::new("PR", pr_url.clone(), true));
    }
    if let (Some(repo), Some(issue)) = (&config.github_repo, item.github_issue_number) {
        notification = notification.with_field(NotificationField::new(
            "Issue",
            format!("https://github.com/{repo}/issues/{issue}"),
            true,
        ));
    }

    notifier.notify(&notification).await;
}

/// Heading every AMPA audit comment carries (spec §3, invariant
/// `requires_audit_result`).
pub const AUDIT_RESULT_HEADING: &str = "# AMPA Audit Result";

async fn post_comment(
    worklog: &dyn Worklog,
    parsed: &AuditReport,
    item: &WorkItem,
    command: &ScheduledCommand,
) {
    let truncate_chars = command.truncate_chars();
    let body = if parsed.raw_text.chars().count() > truncate_chars {
        match write_overflow_file(item.id.as_str(), &parsed.raw_text) {
            Ok(path) => {
                let short = format!(
                    "{AUDIT_RESULT_HEADING}\n\nReport exceeded {truncate_chars} characters; full text at {}",
                    path.display()
                );
                if let Err(e) = worklog.add_comment(&item.id, "ampa", &short).await {
                    warn!(item_id = %item.id, error = %e, "failed to post overflow audit comment");
                } else if let Err(e) = std::fs::remove_file(&path) {
                    warn!(path = %path.display(), error = %e, "failed to clean up overflow report file");
                }
                return;
            }
            Err(e) => {
                warn!(item_id = %item.id, error = %e, "failed to write overflow report file, posting truncated body inline");
                format!("{AUDIT_RESULT_HEADING}\n\n{}", ampa_core::notification::truncate_bytes(&parsed.raw_text, truncate_chars))
            }
        }
    } else {
        format!("{AUDIT_RESULT_HEADING}\n\n{}", parsed.raw_text)
    };

    if let Err(e) = worklog.add_comment(&item.id, "ampa", &body).await {
        warn!(item_id = %item.id, error = %e, "failed to post audit comment");
    }
}

fn write_overflow_file(item_id: &str, body: &str) -> std::io::Result<PathBuf> {
    let path = std::env::temp_dir().join(format!("ampa-audit-{item_id}.txt"));
    std::fs::write(&path, body)?;
    Ok(path)
}

/// Positive closure token present in the report body, or the fallback
/// `"PR merged"` token anywhere in the raw captured output (spec §4.6
/// step 5a).
fn closes_item(parsed: &AuditReport, captured: &ampa_adapters::AgentRunOutput) -> bool {
    parsed.closes_item || captured.combined.contains("PR merged")
}

async fn maybe_auto_complete(
    worklog: &dyn Worklog,
    github: &dyn GithubCli,
    parsed: &AuditReport,
    captured: &ampa_adapters::AgentRunOutput,
    item: &WorkItem,
    command: &ScheduledCommand,
    verify_pr_with_gh_env: Option<bool>,
) -> bool {
    if !closes_item(parsed, captured) {
        return false;
    }

    let mut backlog = Vec::new();
    for child_id in &item.children {
        match worklog.show(child_id).await {
            Ok(child) => backlog.push(child),
            Err(e) => {
                warn!(item_id = %item.id, %child_id, error = %e, "failed to resolve child status, treating auto-completion as blocked");
                return false;
            }
        }
    }
    if !item.children_all_terminal(&backlog) {
        return false;
    }

    if let Some(pr_url) = &parsed.pr_url {
        if command.verify_pr_with_gh(verify_pr_with_gh_env) {
            match github.is_pr_merged(pr_url).await {
                Ok(true) => {}
                Ok(false) => return false,
                Err(e) => {
                    // Absence/failure of `gh` is treated as unverified, not a hard NO
                    // (spec §9 open question, resolved in DESIGN.md): skip auto-completion.
                    warn!(item_id = %item.id, error = %e, "gh PR verification failed, skipping auto-completion");
                    return false;
                }
            }
        }
    }

    let update = WorkItemUpdate {
        status: Some(ampa_core::Status::Completed),
        stage: Some(ampa_core::Stage::InReview),
        needs_producer_review: Some(true),
        ..Default::default()
    };
    if let Err(e) = worklog.update(&item.id, update).await {
        warn!(item_id = %item.id, error = %e, "failed to auto-complete item");
        return false;
    }
    if let Err(e) = worklog
        .add_comment(&item.id, "ampa", "Auto-completed: audit recommended closure and all gates passed.")
        .await
    {
        warn!(item_id = %item.id, error = %e, "failed to post auto-complete comment");
    }
    info!(item_id = %item.id, "item auto-completed after audit");
    true
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
