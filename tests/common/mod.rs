// Shared test helpers, not all items used by every test binary.
#![allow(unused)]

use async_trait::async_trait;
use groupsync::GroupSyncError;
use groupsync::bus::{BusEvent, InboundEvent, MessageUpdate};
use groupsync::config::Config;
use groupsync::mirror::{JitterDelay, MediaDescriptor, MirrorEngine};
use groupsync::transport::{MediaPayload, MediaStream, Transport};
use serde_json::{Value, json};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const SOURCE: &str = "120363000000000001@g.us";

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text { chat: String, text: String },
    Media { chat: String, kind: String, bytes: usize, caption: Option<String> },
    Edit { chat: String, id: String, text: String },
    Delete { chat: String, id: String },
}

impl Sent {
    pub fn chat(&self) -> &str {
        match self {
            Self::Text { chat, .. }
            | Self::Media { chat, .. }
            | Self::Edit { chat, .. }
            | Self::Delete { chat, .. } => chat,
        }
    }
}

/// In-memory transport that records every call and hands out
/// sequential message ids.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Sent>>,
    failing: Mutex<HashSet<String>>,
    media: Mutex<Option<Vec<u8>>>,
    next_id: Mutex<usize>,
}

impl RecordingTransport {
    pub fn fail_chat(&self, chat: &str) {
        self.failing.lock().unwrap().insert(chat.to_string());
    }

    pub fn recover_chat(&self, chat: &str) {
        self.failing.lock().unwrap().remove(chat);
    }

    pub fn serve_media(&self, bytes: &[u8]) {
        *self.media.lock().unwrap() = Some(bytes.to_vec());
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, chat: &str) -> Vec<Sent> {
        self.sent().into_iter().filter(|s| s.chat() == chat).collect()
    }

    pub fn summaries(&self) -> Vec<String> {
        self.sent_to(SOURCE)
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Sent) -> Result<String, GroupSyncError> {
        let chat = call.chat().to_string();
        self.sent.lock().unwrap().push(call);
        if self.failing.lock().unwrap().contains(&chat) {
            return Err(GroupSyncError::Transport {
                message: format!("{} unreachable", chat),
                retryable: true,
            });
        }
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        Ok(format!("OUT{}", *next))
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_text(&self, chat_id: &str, text: &str) -> Result<String, GroupSyncError> {
        self.record(Sent::Text {
            chat: chat_id.to_string(),
            text: text.to_string(),
        })
    }

    async fn send_media(
        &self,
        chat_id: &str,
        payload: MediaPayload<'_>,
    ) -> Result<String, GroupSyncError> {
        self.record(Sent::Media {
            chat: chat_id.to_string(),
            kind: payload.kind.to_string(),
            bytes: payload.data.len(),
            caption: payload.caption.map(ToString::to_string),
        })
    }

    async fn send_edit(
        &self,
        chat_id: &str,
        message_id: &str,
        text: &str,
    ) -> Result<String, GroupSyncError> {
        self.record(Sent::Edit {
            chat: chat_id.to_string(),
            id: message_id.to_string(),
            text: text.to_string(),
        })
    }

    async fn send_delete(&self, chat_id: &str, message_id: &str) -> Result<String, GroupSyncError> {
        self.record(Sent::Delete {
            chat: chat_id.to_string(),
            id: message_id.to_string(),
        })
    }

    async fn open_media(
        &self,
        _event_id: &str,
        _media: &MediaDescriptor,
    ) -> Result<MediaStream, GroupSyncError> {
        use futures_util::StreamExt;
        match self.media.lock().unwrap().clone() {
            Some(bytes) => Ok(futures_util::stream::iter(vec![Ok(bytes)]).boxed()),
            None => Err(GroupSyncError::Download("media no longer available".into())),
        }
    }
}

pub fn targets(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("12036300000000010{}@g.us", i)).collect()
}

/// Engine with zero send delay and a private temp dir.
pub fn engine_with(targets: Vec<String>) -> (MirrorEngine, Arc<RecordingTransport>, TempDir) {
    let tmp = TempDir::new().expect("create temp dir");
    let mut config = Config::new(SOURCE, targets);
    config.media.temp_dir = tmp.path().to_path_buf();
    let transport = Arc::new(RecordingTransport::default());
    let engine =
        MirrorEngine::new(&config, transport.clone()).with_pacer(Box::new(JitterDelay::none()));
    (engine, transport, tmp)
}

/// Build an inbound message the way the bridge posts it.
pub fn message_event(id: &str, message: Value) -> InboundEvent {
    let event: BusEvent = serde_json::from_value(json!({
        "type": "message",
        "id": id,
        "chatId": SOURCE,
        "fromMe": false,
        "pushName": "Dana",
        "message": message,
    }))
    .expect("valid message event");
    match event {
        BusEvent::Message(msg) => msg,
        other => panic!("unexpected event {:?}", other),
    }
}

pub fn text_event(id: &str, text: &str) -> InboundEvent {
    message_event(id, json!({"conversation": text}))
}

pub fn update_event(id: &str, update: Value) -> MessageUpdate {
    MessageUpdate {
        id: id.to_string(),
        chat_id: SOURCE.to_string(),
        update,
    }
}
