use crate::bus::content::MessageContent;
use serde::{Deserialize, Serialize};

/// Everything the bridge can push at us, tagged by `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BusEvent {
    Message(InboundEvent),
    Update(MessageUpdate),
    Connection(ConnectionEvent),
}

impl BusEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Message(_) => "message",
            Self::Update(_) => "update",
            Self::Connection(_) => "connection",
        }
    }
}

/// A new message seen in some conversation. Immutable once received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundEvent {
    pub id: String,
    #[serde(rename = "chatId")]
    pub chat_id: String,
    #[serde(default, rename = "fromMe")]
    pub from_me: bool,
    #[serde(default, rename = "pushName")]
    pub push_name: Option<String>,
    #[serde(default)]
    pub message: Option<MessageContent>,
}

impl InboundEvent {
    pub fn sender_name(&self) -> &str {
        self.push_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("Unknown user")
    }
}

/// A change to an existing message: edit, revoke, or anything else the
/// platform reports. The body is kept raw because its shape varies across
/// client versions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageUpdate {
    pub id: String,
    #[serde(rename = "chatId")]
    pub chat_id: String,
    #[serde(default)]
    pub update: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionEvent {
    pub state: String,
    #[serde(default)]
    pub reason: Option<String>,
}
