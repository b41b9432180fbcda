// SPDX-License-Identifier: MIT
// Copyright (c) 2026 AMPA Authors

use super::*;

#[test]
fn bot_token_is_preferred_when_both_credentials_are_set() {
    let cred = NotifierCredential::from_env_values(
        Some("https://discord.com/api/webhooks/1/abc".to_string()),
        Some("botsecret".to_string()),
    );
    assert_eq!(cred, Some(NotifierCredential::BotToken("botsecret".to_string())));
}

#[test]
fn webhook_url_is_used_when_bot_token_is_absent() {
    let cred = NotifierCredential::from_env_values(
        Some("https://discord.com/api/webhooks/1/abc".to_string()),
        None,
    );
    assert_eq!(cred, Some(NotifierCredential::WebhookUrl("https://discord.com/api/webhooks/1/abc".to_string())));
}

#[test]
fn no_credential_resolves_to_none() {
    assert_eq!(NotifierCredential::from_env_values(None, None), None);
}

#[tokio::test]
async fn fake_notifier_records_every_notification() {
    let notifier = FakeNotifier::new();
    let n = Notification::new("ops", "hello", Severity::Info);
    notifier.notify(&n).await;
    assert_eq!(notifier.sent().len(), 1);
    assert_eq!(notifier.sent()[0].title, "hello");
}
