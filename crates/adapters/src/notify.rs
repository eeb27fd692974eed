// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification sinks and the deduplicating dispatcher that fronts them.
//!
//! `(run_id, event_kind)` produces at most one notification per sink: the
//! first call wins, duplicates are suppressed silently via an append-only
//! record on disk (see [`Dedup`]).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("send failed: {0}")]
    SendFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyEvent {
    pub run_id: String,
    pub event_kind: String,
    pub title: String,
    pub message: String,
}

/// One destination a notification can be sent to.
#[async_trait]
pub trait NotifySink: Send + Sync {
    fn name(&self) -> &'static str;
    async fn send(&self, event: &NotifyEvent) -> Result<(), NotifyError>;
}

/// Prints to standard error; always available, never configured away.
#[derive(Default)]
pub struct TerminalSink;

#[async_trait]
impl NotifySink for TerminalSink {
    fn name(&self) -> &'static str {
        "terminal"
    }

    async fn send(&self, event: &NotifyEvent) -> Result<(), NotifyError> {
        tracing::info!(run_id = %event.run_id, title = %event.title, "{}", event.message);
        Ok(())
    }
}

/// Desktop notification sink using notify-rust.
///
/// On macOS, `notify-rust` uses `mac-notification-sys` (Cocoa bindings) to send
/// notifications via the Notification Center. The first notification triggers
/// `ensure_application_set()` which runs an AppleScript to look up a bundle
/// identifier; in a headless context without Automation permissions that
/// AppleScript blocks forever, so the bundle id is pre-set at construction.
#[derive(Clone, Copy, Debug, Default)]
pub struct DesktopSink;

impl DesktopSink {
    pub fn new() -> Self {
        #[cfg(target_os = "macos")]
        {
            let _ = mac_notification_sys::set_application("com.apple.Terminal");
        }
        Self
    }
}

#[async_trait]
impl NotifySink for DesktopSink {
    fn name(&self) -> &'static str {
        "desktop"
    }

    async fn send(&self, event: &NotifyEvent) -> Result<(), NotifyError> {
        let title = event.title.clone();
        let message = event.message.clone();
        tokio::task::spawn_blocking(move || {
            match notify_rust::Notification::new().summary(&title).body(&message).show() {
                Ok(_) => tracing::info!(%title, "desktop notification sent"),
                Err(e) => tracing::warn!(%title, error = %e, "desktop notification failed"),
            }
        });
        Ok(())
    }
}

/// Generic webhook sink (Slack/Discord-compatible `{"text": ...}` payload).
pub struct WebhookSink {
    name: &'static str,
    url: String,
}

impl WebhookSink {
    pub fn slack(url: impl Into<String>) -> Self {
        Self { name: "slack", url: url.into() }
    }

    pub fn discord(url: impl Into<String>) -> Self {
        Self { name: "discord", url: url.into() }
    }

    pub fn agent_mail(url: impl Into<String>) -> Self {
        Self { name: "agent_mail", url: url.into() }
    }
}

#[async_trait]
impl NotifySink for WebhookSink {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn send(&self, event: &NotifyEvent) -> Result<(), NotifyError> {
        let url = self.url.clone();
        let body = serde_json::json!({
            "text": format!("{}: {}", event.title, event.message),
            "run_id": event.run_id,
        });
        tokio::task::spawn_blocking(move || {
            ureq::post(&url)
                .send_json(body)
                .map(|_| ())
                .map_err(|e| NotifyError::SendFailed(e.to_string()))
        })
        .await
        .map_err(|e| NotifyError::SendFailed(e.to_string()))?
    }
}

/// Append-only record of `(run_id, event_kind)` pairs already sent, used to
/// suppress duplicate notifications across repeated invocations.
pub struct Dedup {
    path: std::path::PathBuf,
}

impl Dedup {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn key(run_id: &str, event_kind: &str) -> String {
        format!("{run_id}\t{event_kind}")
    }

    pub fn already_sent(&self, run_id: &str, event_kind: &str) -> bool {
        let Ok(text) = std::fs::read_to_string(&self.path) else {
            return false;
        };
        let key = Self::key(run_id, event_kind);
        text.lines().any(|l| l == key)
    }

    pub fn mark_sent(&self, run_id: &str, event_kind: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        use std::io::Write;
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", Self::key(run_id, event_kind))
    }
}

/// Fans one event out to every configured sink, after checking (and then
/// updating) the dedup record.
pub struct NotificationCenter {
    sinks: Vec<Box<dyn NotifySink>>,
    dedup: Dedup,
}

impl NotificationCenter {
    pub fn new(sinks: Vec<Box<dyn NotifySink>>, dedup_path: impl Into<std::path::PathBuf>) -> Self {
        Self {
            sinks,
            dedup: Dedup::new(dedup_path),
        }
    }

    /// Send `event` to every sink, unless `(run_id, event_kind)` was
    /// already sent. Returns the names of sinks that failed; a failed
    /// sink does not stop delivery to the others.
    pub async fn notify(&self, event: &NotifyEvent) -> Vec<String> {
        if self.dedup.already_sent(&event.run_id, &event.event_kind) {
            tracing::debug!(run_id = %event.run_id, event_kind = %event.event_kind, "notification already sent");
            return Vec::new();
        }

        let mut failed = Vec::new();
        for sink in &self.sinks {
            if let Err(e) = sink.send(event).await {
                tracing::warn!(sink = sink.name(), error = %e, "notification sink failed");
                failed.push(sink.name().to_string());
            }
        }

        if let Err(e) = self.dedup.mark_sent(&event.run_id, &event.event_kind) {
            tracing::warn!(error = %e, "failed to record notification as sent");
        }

        failed
    }
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::{NotifyError, NotifyEvent, NotifySink};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone)]
    pub struct FakeSink {
        name: &'static str,
        calls: Arc<Mutex<Vec<NotifyEvent>>>,
    }

    impl FakeSink {
        pub fn new(name: &'static str) -> Self {
            Self {
                name,
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn calls(&self) -> Vec<NotifyEvent> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl NotifySink for FakeSink {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn send(&self, event: &NotifyEvent) -> Result<(), NotifyError> {
            self.calls.lock().push(event.clone());
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeSink;

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
