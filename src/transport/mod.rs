//! The narrow interface to the messaging platform.
//!
//! Session handling, pairing and reconnects belong to whatever sits behind
//! this trait; the mirror only sends, edits, deletes and downloads.

pub mod bridge;
#[cfg(test)]
pub(crate) mod mock;

pub use bridge::HttpBridge;

use crate::errors::GroupSyncError;
use crate::mirror::classify::{MediaDescriptor, MessageKind};
use async_trait::async_trait;
use futures_util::stream::BoxStream;

/// Chunks of a media download, in order.
pub type MediaStream = BoxStream<'static, Result<Vec<u8>, GroupSyncError>>;

/// A media message ready to post into one target conversation.
#[derive(Debug, Clone, Copy)]
pub struct MediaPayload<'a> {
    pub kind: MessageKind,
    pub data: &'a [u8],
    pub caption: Option<&'a str>,
    /// Only set for documents.
    pub mimetype: Option<&'a str>,
    /// Only set for documents.
    pub file_name: Option<&'a str>,
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Post a text message, returning the new message's id.
    async fn send_text(&self, chat_id: &str, text: &str) -> Result<String, GroupSyncError>;

    /// Post a media message, returning the new message's id.
    async fn send_media(
        &self,
        chat_id: &str,
        payload: MediaPayload<'_>,
    ) -> Result<String, GroupSyncError>;

    /// Replace the text of a message we posted earlier.
    async fn send_edit(
        &self,
        chat_id: &str,
        message_id: &str,
        text: &str,
    ) -> Result<String, GroupSyncError>;

    /// Delete a message we posted earlier, for everyone.
    async fn send_delete(&self, chat_id: &str, message_id: &str)
    -> Result<String, GroupSyncError>;

    /// Open the content stream of a received media message.
    async fn open_media(
        &self,
        event_id: &str,
        media: &MediaDescriptor,
    ) -> Result<MediaStream, GroupSyncError>;
}
