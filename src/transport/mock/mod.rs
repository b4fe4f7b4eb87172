//! Recording `Transport` for unit tests.

use crate::errors::GroupSyncError;
use crate::mirror::classify::{MediaDescriptor, MessageKind};
use crate::transport::{MediaPayload, MediaStream, Transport};
use async_trait::async_trait;
use futures_util::StreamExt;
use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Text {
        chat_id: String,
        text: String,
    },
    Media {
        chat_id: String,
        kind: MessageKind,
        data: Vec<u8>,
        caption: Option<String>,
        mimetype: Option<String>,
        file_name: Option<String>,
    },
    Edit {
        chat_id: String,
        message_id: String,
        text: String,
    },
    Delete {
        chat_id: String,
        message_id: String,
    },
    Download {
        event_id: String,
    },
}

impl Call {
    pub fn chat_id(&self) -> Option<&str> {
        match self {
            Self::Text { chat_id, .. }
            | Self::Media { chat_id, .. }
            | Self::Edit { chat_id, .. }
            | Self::Delete { chat_id, .. } => Some(chat_id),
            Self::Download { .. } => None,
        }
    }
}

pub struct MockTransport {
    calls: Mutex<Vec<Call>>,
    failing: Mutex<HashSet<String>>,
    download: Mutex<Result<Vec<Vec<u8>>, String>>,
    counter: AtomicUsize,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            download: Mutex::new(Ok(vec![b"media-bytes".to_vec()])),
            counter: AtomicUsize::new(0),
        }
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send into `chat_id` fails from now on.
    pub fn fail_chat(&self, chat_id: &str) {
        self.failing.lock().unwrap().insert(chat_id.to_string());
    }

    pub fn set_download_chunks(&self, chunks: Vec<Vec<u8>>) {
        *self.download.lock().unwrap() = Ok(chunks);
    }

    pub fn fail_download(&self, message: &str) {
        *self.download.lock().unwrap() = Err(message.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, chat_id: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.chat_id() == Some(chat_id))
            .collect()
    }

    fn record(&self, call: Call) -> Result<String, GroupSyncError> {
        let chat_id = call.chat_id().unwrap_or_default().to_string();
        self.calls.lock().unwrap().push(call);
        if self.failing.lock().unwrap().contains(&chat_id) {
            return Err(GroupSyncError::transport(
                format!("send to {} rejected", chat_id),
                false,
            ));
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("{}-msg-{}", chat_id, n))
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send_text(&self, chat_id: &str, text: &str) -> Result<String, GroupSyncError> {
        self.record(Call::Text {
            chat_id: chat_id.to_string(),
            text: text.to_string(),
        })
    }

    async fn send_media(
        &self,
        chat_id: &str,
        payload: MediaPayload<'_>,
    ) -> Result<String, GroupSyncError> {
        self.record(Call::Media {
            chat_id: chat_id.to_string(),
            kind: payload.kind,
            data: payload.data.to_vec(),
            caption: payload.caption.map(ToString::to_string),
            mimetype: payload.mimetype.map(ToString::to_string),
            file_name: payload.file_name.map(ToString::to_string),
        })
    }

    async fn send_edit(
        &self,
        chat_id: &str,
        message_id: &str,
        text: &str,
    ) -> Result<String, GroupSyncError> {
        self.record(Call::Edit {
            chat_id: chat_id.to_string(),
            message_id: message_id.to_string(),
            text: text.to_string(),
        })
    }

    async fn send_delete(
        &self,
        chat_id: &str,
        message_id: &str,
    ) -> Result<String, GroupSyncError> {
        self.record(Call::Delete {
            chat_id: chat_id.to_string(),
            message_id: message_id.to_string(),
        })
    }

    async fn open_media(
        &self,
        event_id: &str,
        _media: &MediaDescriptor,
    ) -> Result<MediaStream, GroupSyncError> {
        self.calls.lock().unwrap().push(Call::Download {
            event_id: event_id.to_string(),
        });
        let chunks = self
            .download
            .lock()
            .unwrap()
            .clone()
            .map_err(GroupSyncError::Download)?;
        Ok(futures_util::stream::iter(chunks.into_iter().map(Ok)).boxed())
    }
}
