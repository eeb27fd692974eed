// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn event(run_id: &str, kind: &str) -> NotifyEvent {
    NotifyEvent {
        run_id: run_id.to_string(),
        event_kind: kind.to_string(),
        title: "widget 1.0.0".to_string(),
        message: "build finished".to_string(),
    }
}

#[tokio::test]
async fn delivers_to_every_sink() {
    let dir = tempfile::tempdir().unwrap();
    let sink_a = FakeSink::new("a");
    let sink_b = FakeSink::new("b");
    let center = NotificationCenter::new(
        vec![Box::new(sink_a.clone()), Box::new(sink_b.clone())],
        dir.path().join("sent.log"),
    );

    let failed = center.notify(&event("run-1", "run_finished")).await;
    assert!(failed.is_empty());
    assert_eq!(sink_a.calls().len(), 1);
    assert_eq!(sink_b.calls().len(), 1);
}

#[tokio::test]
async fn second_call_with_same_key_is_suppressed() {
    let dir = tempfile::tempdir().unwrap();
    let sink = FakeSink::new("a");
    let center = NotificationCenter::new(vec![Box::new(sink.clone())], dir.path().join("sent.log"));

    center.notify(&event("run-1", "run_finished")).await;
    center.notify(&event("run-1", "run_finished")).await;

    assert_eq!(sink.calls().len(), 1);
}

#[tokio::test]
async fn different_event_kind_is_not_suppressed() {
    let dir = tempfile::tempdir().unwrap();
    let sink = FakeSink::new("a");
    let center = NotificationCenter::new(vec![Box::new(sink.clone())], dir.path().join("sent.log"));

    center.notify(&event("run-1", "run_started")).await;
    center.notify(&event("run-1", "run_finished")).await;

    assert_eq!(sink.calls().len(), 2);
}

#[yare::parameterized(
    slack = { WebhookSink::slack("https://hooks.example/slack"), "slack" },
    discord = { WebhookSink::discord("https://hooks.example/discord"), "discord" },
    agent_mail = { WebhookSink::agent_mail("https://hooks.example/mail"), "agent_mail" },
)]
fn webhook_sink_name_matches_its_constructor(sink: WebhookSink, expected: &str) {
    assert_eq!(sink.name(), expected);
}

#[test]
fn dedup_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sent.log");
    let dedup = Dedup::new(&path);
    assert!(!dedup.already_sent("run-1", "run_finished"));
    dedup.mark_sent("run-1", "run_finished").unwrap();

    let dedup2 = Dedup::new(&path);
    assert!(dedup2.already_sent("run-1", "run_finished"));
}
