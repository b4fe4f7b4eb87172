//! Replay edits and deletes of a source message onto its mirrors.

use crate::mirror::mapping::MappingEntry;
use crate::transport::Transport;
use serde_json::Value;
use tracing::{error, info};

const MAX_SEARCH_DEPTH: usize = 6;

/// WhatsApp stub types that mean the message is gone.
const STUB_REVOKE: i64 = 1;
const STUB_PROTOCOL_DELETE: i64 = 68;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateAction {
    Edit(String),
    Delete,
    Ignore,
}

impl UpdateAction {
    /// Work out what an update payload means. An edit wins over a delete.
    pub fn detect(update: &Value) -> Self {
        let message = update.get("message");

        if let Some(message) = message.filter(|m| !m.is_null()) {
            if let Some(text) = edited_text(message) {
                return Self::Edit(text.to_string());
            }
            if let Some(text) = fallback_search_text(message, 0) {
                return Self::Edit(text.to_string());
            }
        }

        let cleared = matches!(message, Some(Value::Null));
        let stub = update.get("messageStubType").and_then(Value::as_i64);
        if cleared || matches!(stub, Some(STUB_REVOKE | STUB_PROTOCOL_DELETE)) {
            return Self::Delete;
        }
        Self::Ignore
    }
}

/// The known shape: `protocolMessage.editedMessage`.
fn edited_text(message: &Value) -> Option<&str> {
    let edited = message.get("protocolMessage")?.get("editedMessage")?;
    text_field(edited)
}

fn text_field(value: &Value) -> Option<&str> {
    non_empty_str(value.get("conversation")).or_else(|| {
        non_empty_str(
            value
                .get("extendedTextMessage")
                .and_then(|e| e.get("text")),
        )
    })
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// Depth-first search for the first non-empty `conversation` or
/// `extendedTextMessage.text`, for payload shapes we do not model.
pub fn fallback_search_text(value: &Value, depth: usize) -> Option<&str> {
    if depth > MAX_SEARCH_DEPTH {
        return None;
    }
    match value {
        Value::Object(map) => text_field(value).or_else(|| {
            map.values()
                .find_map(|v| fallback_search_text(v, depth + 1))
        }),
        Value::Array(items) => items
            .iter()
            .find_map(|v| fallback_search_text(v, depth + 1)),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub succeeded: usize,
    pub failed: usize,
}

/// Edit every recorded copy to `text`. Failures are logged and skipped.
pub async fn replay_edit(
    transport: &dyn Transport,
    entry: &MappingEntry,
    text: &str,
) -> ReplayReport {
    let mut report = ReplayReport::default();
    for copy in &entry.copies {
        match transport
            .send_edit(&copy.chat_id, &copy.message_id, text)
            .await
        {
            Ok(_) => {
                info!("edited {} in {}", copy.message_id, copy.chat_id);
                report.succeeded += 1;
            }
            Err(e) => {
                error!(
                    "failed to edit {} in {}: {}",
                    copy.message_id, copy.chat_id, e
                );
                report.failed += 1;
            }
        }
    }
    report
}

/// Delete every recorded copy. Failures are logged and skipped.
pub async fn replay_delete(transport: &dyn Transport, entry: &MappingEntry) -> ReplayReport {
    let mut report = ReplayReport::default();
    for copy in &entry.copies {
        match transport.send_delete(&copy.chat_id, &copy.message_id).await {
            Ok(_) => {
                info!("deleted {} in {}", copy.message_id, copy.chat_id);
                report.succeeded += 1;
            }
            Err(e) => {
                error!(
                    "failed to delete {} in {}: {}",
                    copy.message_id, copy.chat_id, e
                );
                report.failed += 1;
            }
        }
    }
    report
}
