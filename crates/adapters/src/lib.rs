// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ampa-adapters: the capability traits the engine drives every
//! external collaborator through (spec §6, §9 "shell-style side
//! effects" redesign note) — `Worklog`, `AgentRunner`, `Notifier` — plus
//! their real (subprocess/HTTP) and fake (in-memory, `test-support`
//! feature-gated) implementations.

pub mod agent_runner;
pub mod github;
pub mod notifier;
pub mod worklog;

pub use agent_runner::{
    render_invocation, render_invocation_with, AgentRunOutput, AgentRunner, AgentRunnerError, ProcessAgentRunner,
};
pub use github::{GithubCli, GithubCliError, ProcessGithubCli};
pub use notifier::{Notifier, NotifierCredential, NullNotifier, WebhookNotifier};
pub use worklog::{normalize_list_response, ProcessWorklog, WorkItemUpdate, Worklog, WorklogError};

#[cfg(any(test, feature = "test-support"))]
pub use agent_runner::FakeAgentRunner;
#[cfg(any(test, feature = "test-support"))]
pub use github::FakeGithubCli;
#[cfg(any(test, feature = "test-support"))]
pub use notifier::FakeNotifier;
#[cfg(any(test, feature = "test-support"))]
pub use worklog::FakeWorklog;
