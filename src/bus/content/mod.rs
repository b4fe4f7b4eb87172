//! Wire model of a WhatsApp message body as forwarded by the bridge.
//!
//! Only the fields the mirror cares about are typed. Media messages keep
//! every other key in `extra` so the bridge can rebuild the download request
//! (media key, direct path, hashes) from what it originally sent us.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_text_message: Option<ExtendedTextMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_message: Option<MediaMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_message: Option<MediaMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_message: Option<MediaMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_message: Option<MediaMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sticker_message: Option<MediaMessage>,
    /// Envelope WhatsApp uses for documents sent with a caption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_with_caption_message: Option<Box<WrappedMessage>>,
}

impl MessageContent {
    /// Unwrap the "document with caption" envelope, if present.
    pub fn actual(&self) -> &MessageContent {
        match self
            .document_with_caption_message
            .as_deref()
            .and_then(|w| w.message.as_ref())
        {
            Some(inner) => inner,
            None => self,
        }
    }

    /// Non-empty plain conversation text, if any.
    pub fn conversation_text(&self) -> Option<&str> {
        self.conversation.as_deref().filter(|c| !c.is_empty())
    }

    /// Text from the plain conversation field or the extended-text field.
    /// An empty conversation falls through to the extended text.
    pub fn text(&self) -> Option<&str> {
        self.conversation_text().or_else(|| {
            self.extended_text_message
                .as_ref()
                .and_then(|e| e.text.as_deref())
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WrappedMessage {
    #[serde(default)]
    pub message: Option<MessageContent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtendedTextMessage {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_u64",
        skip_serializing_if = "Option::is_none"
    )]
    pub file_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// protobuf `uint64` fields reach us as numbers, decimal strings, or
/// `{low, high, unsigned}` Long objects depending on the bridge build.
fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        Some(Value::Object(map)) => {
            let low = map.get("low").and_then(Value::as_i64).unwrap_or(0) as u32;
            let high = map.get("high").and_then(Value::as_i64).unwrap_or(0) as u32;
            Some((u64::from(high) << 32) | u64::from(low))
        }
        _ => None,
    })
}
