// src/notify.rs
//
// Best-effort run summaries. Delivery problems are logged and swallowed;
// a run never fails because a chat message did not go out.

use std::fmt::{self, Write as _};

use chrono::SecondsFormat;
use reqwest::blocking::Client;
use serde_json::json;
use tracing::{debug, warn};

use crate::data::RunRecord;
use crate::error::NotifyError;

/// Discord rejects message content above 2000 characters.
const MAX_CONTENT_CHARS: usize = 1900;

pub trait Notifier {
    fn notify(&self, text: &str) -> Result<(), NotifyError>;
}

/// Used when no endpoint is configured.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _text: &str) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Posts `{ "content": text }` to a chat webhook.
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self { client, url: url.into() }
    }
}

impl Notifier for WebhookNotifier {
    fn notify(&self, text: &str) -> Result<(), NotifyError> {
        let body = json!({ "content": truncate_chars(text, MAX_CONTENT_CHARS) });
        let resp = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .map_err(|e| NotifyError(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(NotifyError(format!("webhook answered HTTP {}", status.as_u16())));
        }
        Ok(())
    }
}

/// Send and forget: failures end up in the log only.
pub fn deliver(notifier: &dyn Notifier, text: &str) {
    match notifier.notify(text) {
        Ok(()) => debug!("notification sent"),
        Err(e) => warn!(error = %e, "notification not delivered"),
    }
}

/// Plain-text summary: timestamp, one line per category, total.
pub fn render_summary(run: &RunRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "**Listing run** {}", run.ts.to_rfc3339_opts(SecondsFormat::Secs, true));
    if !run.source.is_empty() {
        let _ = writeln!(out, "source: {}", run.source);
    }
    for o in &run.results {
        let _ = writeln!(out, "- {}: {} ({})", o.key, o.count, o.status);
    }
    let _ = write!(out, "total: {}", run.totals);
    out
}

pub fn render_failure(err: &dyn fmt::Display) -> String {
    format!("**Listing run failed**\n{err}")
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
