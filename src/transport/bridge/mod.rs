//! `Transport` over the HTTP API of a WhatsApp bridge sidecar.
//!
//! The sidecar owns the linked-device session. We post JSON to it and it
//! answers with the id of the message it created.

use crate::config::BridgeConfig;
use crate::errors::GroupSyncError;
use crate::transport::{MediaPayload, MediaStream, Transport};
use crate::mirror::classify::MediaDescriptor;
use crate::utils::http::{http_client, truncate_for_log};
use async_trait::async_trait;
use base64::Engine;
use futures_util::StreamExt;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

pub struct HttpBridge {
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl HttpBridge {
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone().filter(|t| !t.is_empty()),
            client: http_client(Duration::from_secs(config.timeout_secs)),
        }
    }

    fn request(&self, path: &str) -> reqwest::RequestBuilder {
        let builder = self.client.post(format!("{}{}", self.base_url, path));
        match self.token {
            Some(ref token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, GroupSyncError> {
        let resp = self.request(path).json(body).send().await.map_err(|e| {
            GroupSyncError::transport(format!("bridge request {} failed: {}", path, e), true)
        })?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(GroupSyncError::transport(
                format!("bridge {} returned {}: {}", path, status, truncate_for_log(&text, 200)),
                is_retryable_status(status),
            ));
        }
        debug!("bridge {} -> {}", path, status);
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| {
            GroupSyncError::transport(
                format!(
                    "invalid JSON from bridge {}: {} (body: {})",
                    path,
                    e,
                    truncate_for_log(&text, 200)
                ),
                false,
            )
        })
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn message_id(body: &Value, path: &str) -> Result<String, GroupSyncError> {
    body["id"]
        .as_str()
        .filter(|id| !id.is_empty())
        .map(ToString::to_string)
        .ok_or_else(|| {
            GroupSyncError::transport(format!("bridge {} response has no message id", path), false)
        })
}

#[async_trait]
impl Transport for HttpBridge {
    async fn send_text(&self, chat_id: &str, text: &str) -> Result<String, GroupSyncError> {
        let path = "/messages/text";
        let body = self
            .post_json(path, &json!({"chatId": chat_id, "text": text}))
            .await?;
        message_id(&body, path)
    }

    async fn send_media(
        &self,
        chat_id: &str,
        payload: MediaPayload<'_>,
    ) -> Result<String, GroupSyncError> {
        let path = "/messages/media";
        let mut request = json!({
            "chatId": chat_id,
            "kind": payload.kind.as_str(),
            "data": base64::engine::general_purpose::STANDARD.encode(payload.data),
        });
        if let Some(caption) = payload.caption {
            request["caption"] = Value::String(caption.to_string());
        }
        if let Some(mimetype) = payload.mimetype {
            request["mimetype"] = Value::String(mimetype.to_string());
        }
        if let Some(file_name) = payload.file_name {
            request["fileName"] = Value::String(file_name.to_string());
        }
        let body = self.post_json(path, &request).await?;
        message_id(&body, path)
    }

    async fn send_edit(
        &self,
        chat_id: &str,
        message_id_to_edit: &str,
        text: &str,
    ) -> Result<String, GroupSyncError> {
        let path = "/messages/edit";
        let body = self
            .post_json(
                path,
                &json!({"chatId": chat_id, "messageId": message_id_to_edit, "text": text}),
            )
            .await?;
        // Some bridge versions answer edits with an empty body
        Ok(message_id(&body, path).unwrap_or_else(|_| message_id_to_edit.to_string()))
    }

    async fn send_delete(
        &self,
        chat_id: &str,
        message_id_to_delete: &str,
    ) -> Result<String, GroupSyncError> {
        let path = "/messages/delete";
        let body = self
            .post_json(
                path,
                &json!({"chatId": chat_id, "messageId": message_id_to_delete}),
            )
            .await?;
        Ok(message_id(&body, path).unwrap_or_else(|_| message_id_to_delete.to_string()))
    }

    async fn open_media(
        &self,
        event_id: &str,
        media: &MediaDescriptor,
    ) -> Result<MediaStream, GroupSyncError> {
        let source = serde_json::to_value(&media.source)
            .map_err(|e| GroupSyncError::Download(format!("cannot encode media message: {}", e)))?;
        let resp = self
            .request("/media/download")
            .json(&json!({
                "messageId": event_id,
                "kind": media.kind.as_str(),
                "message": source,
            }))
            .send()
            .await
            .map_err(|e| GroupSyncError::Download(format!("bridge download request failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(GroupSyncError::Download(format!(
                "bridge download returned {}: {}",
                status,
                truncate_for_log(&text, 200)
            )));
        }

        let stream = resp.bytes_stream().map(|chunk| {
            chunk
                .map(|bytes| bytes.to_vec())
                .map_err(|e| GroupSyncError::Download(format!("media stream interrupted: {}", e)))
        });
        Ok(stream.boxed())
    }
}
