// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

//! The `Notifier` capability: formats and posts chat notifications to a
//! Discord-compatible webhook (spec §4.9/§6/§7). A failed post is
//! logged and never propagated as a fatal error — the audit/delegation
//! flow completes regardless of webhook availability (spec §8).

use ampa_core::{Notification, Severity};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

/// Severity → embed color, matching common Discord-webhook convention.
fn severity_color(severity: Severity) -> u32 {
    match severity {
        Severity::Info => 0x5865F2,
        Severity::Warning => 0xFEE75C,
        Severity::Error => 0xED4245,
    }
}

#[derive(Debug, Serialize)]
struct EmbedField<'a> {
    name: &'a str,
    value: &'a str,
    inline: bool,
}

#[derive(Debug, Serialize)]
struct Embed<'a> {
    title: &'a str,
    description: &'a str,
    fields: Vec<EmbedField<'a>>,
    color: u32,
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
    embeds: Vec<Embed<'a>>,
}

/// Which credential path a [`WebhookNotifier`] was configured with,
/// surfaced so the daemon can log which one is in effect (spec §9 open
/// question: accept either, prefer the bot token, log which path was
/// used).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierCredential {
    /// `AMPA_DISCORD_WEBHOOK`: a pre-signed webhook URL, posted to directly.
    WebhookUrl(String),
    /// `AMPA_DISCORD_BOT_TOKEN`: a bot token, posted via the channel
    /// messages endpoint using [`Notification::channel`] as the channel id.
    BotToken(String),
}

impl NotifierCredential {
    /// Resolve from the two env vars spec §6/§9 document, preferring the
    /// bot token when both are set.
    pub fn from_env_values(webhook: Option<String>, bot_token: Option<String>) -> Option<Self> {
        match (bot_token, webhook) {
            (Some(token), _) if !token.is_empty() => Some(Self::BotToken(token)),
            (_, Some(url)) if !url.is_empty() => Some(Self::WebhookUrl(url)),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::BotToken(_) => "bot-token",
            Self::WebhookUrl(_) => "webhook-url",
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    async fn notify(&self, notification: &Notification);
}

/// Real notifier: posts to Discord's webhook or bot-token channel
/// message endpoint, retrying transient network failures up to 3
/// attempts total with exponential backoff (spec §7 `TransientNetworkError`).
pub struct WebhookNotifier {
    client: reqwest::Client,
    credential: NotifierCredential,
}

impl WebhookNotifier {
    pub fn new(credential: NotifierCredential) -> Self {
        info!(credential = credential.label(), "notifier credential resolved");
        Self { client: reqwest::Client::new(), credential }
    }

    fn endpoint_and_auth(&self, notification: &Notification) -> (String, Option<String>) {
        match &self.credential {
            NotifierCredential::WebhookUrl(url) => (url.clone(), None),
            NotifierCredential::BotToken(token) => (
                format!("https://discord.com/api/v10/channels/{}/messages", notification.channel),
                Some(format!("Bot {token}")),
            ),
        }
    }

    async fn post_once(&self, notification: &Notification) -> Result<(), reqwest::Error> {
        let (endpoint, auth) = self.endpoint_and_auth(notification);
        let payload = WebhookPayload {
            content: "",
            embeds: vec![Embed {
                title: &notification.title,
                description: &notification.body,
                fields: notification
                    .fields
                    .iter()
                    .map(|f| EmbedField { name: &f.name, value: &f.value, inline: f.inline })
                    .collect(),
                color: severity_color(notification.severity),
            }],
        };

        let mut req = self.client.post(&endpoint).json(&payload);
        if let Some(auth) = auth {
            req = req.header("Authorization", auth);
        }
        req.send().await?.error_for_status()?;
        Ok(())
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, notification: &Notification) {
        const MAX_ATTEMPTS: u32 = 3;
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.post_once(notification).await {
                Ok(()) => return,
                Err(e) if attempt < MAX_ATTEMPTS => {
                    let backoff = Duration::from_millis(200 * 2u64.pow(attempt - 1));
                    warn!(attempt, error = %e, "webhook post failed, retrying");
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => {
                    warn!(attempt, error = %e, "webhook post failed after final attempt, giving up");
                    return;
                }
            }
        }
    }
}

/// No-op notifier used when no credential is configured (spec §6: the
/// webhook is optional; absence is not a `ConfigError`).
#[derive(Debug, Clone, Default)]
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn notify(&self, notification: &Notification) {
        info!(title = %notification.title, channel = %notification.channel, "no notifier configured, dropping notification");
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Debug, Clone, Default)]
    pub struct FakeNotifier {
        sent: Arc<Mutex<Vec<Notification>>>,
    }

    impl FakeNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn sent(&self) -> Vec<Notification> {
            self.sent.lock().clone()
        }
    }

    #[async_trait]
    impl Notifier for FakeNotifier {
        async fn notify(&self, notification: &Notification) {
            self.sent.lock().push(notification.clone());
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeNotifier;

#[cfg(test)]
#[path = "notifier_tests.rs"]
mod tests;
