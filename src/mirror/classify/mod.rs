//! Decide what kind of message we are looking at and where its payload lives.

use crate::bus::{MediaMessage, MessageContent};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Image,
    Video,
    Document,
    Audio,
    Sticker,
    Unsupported,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Video => "video",
            Self::Document => "document",
            Self::Audio => "audio",
            Self::Sticker => "sticker",
            Self::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attachment details needed to download and re-post a media message.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaDescriptor {
    pub kind: MessageKind,
    pub mime_type: Option<String>,
    pub byte_length: Option<u64>,
    pub caption: Option<String>,
    pub file_name: Option<String>,
    /// The original media message, handed back to the bridge for download.
    pub source: MediaMessage,
}

impl MediaDescriptor {
    fn from_message(kind: MessageKind, media: &MediaMessage) -> Self {
        Self {
            kind,
            mime_type: media.mimetype.clone(),
            byte_length: media.file_length,
            caption: media.caption.clone().filter(|c| !c.is_empty()),
            file_name: media.file_name.clone(),
            source: media.clone(),
        }
    }

    /// File name used when re-posting a document; WhatsApp requires one.
    pub fn document_file_name(&self) -> &str {
        self.file_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("file")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedMessage {
    pub kind: MessageKind,
    /// Set for text messages; empty means there is nothing to send.
    pub text: Option<String>,
    pub media: Option<MediaDescriptor>,
}

impl ClassifiedMessage {
    pub fn unsupported() -> Self {
        Self {
            kind: MessageKind::Unsupported,
            text: None,
            media: None,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.kind != MessageKind::Unsupported
    }
}

/// Classify a message body. First match wins, in the order image, video,
/// document, audio, sticker, then plain or extended text.
pub fn classify(raw: &MessageContent) -> ClassifiedMessage {
    let content = raw.actual();

    let media_slots = [
        (MessageKind::Image, &content.image_message),
        (MessageKind::Video, &content.video_message),
        (MessageKind::Document, &content.document_message),
        (MessageKind::Audio, &content.audio_message),
        (MessageKind::Sticker, &content.sticker_message),
    ];
    for (kind, slot) in media_slots {
        if let Some(media) = slot {
            return ClassifiedMessage {
                kind,
                text: None,
                media: Some(MediaDescriptor::from_message(kind, media)),
            };
        }
    }

    // An empty conversation does not make a text message on its own
    if content.conversation_text().is_some() || content.extended_text_message.is_some() {
        return ClassifiedMessage {
            kind: MessageKind::Text,
            text: Some(content.text().unwrap_or_default().to_string()),
            media: None,
        };
    }

    ClassifiedMessage::unsupported()
}
