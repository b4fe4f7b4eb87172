//! Sequential fan-out of one message to every target conversation.

use crate::config::DispatchConfig;
use crate::mirror::classify::{MediaDescriptor, MessageKind};
use crate::transport::{MediaPayload, Transport};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info};

/// Spacing between consecutive sends, so a burst of copies does not trip
/// the platform's flood protection.
#[async_trait]
pub trait SendPacer: Send + Sync {
    async fn pause(&self);
}

/// Waits a uniformly random delay in `[min, max]` before every send.
#[derive(Debug, Clone, Copy)]
pub struct JitterDelay {
    min: Duration,
    max: Duration,
}

impl JitterDelay {
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn from_config(config: &DispatchConfig) -> Self {
        Self::new(
            Duration::from_millis(config.min_delay_ms),
            Duration::from_millis(config.max_delay_ms),
        )
    }

    /// No waiting at all.
    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn next_delay(&self) -> Duration {
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        Duration::from_millis(fastrand::u64(min..=max))
    }
}

#[async_trait]
impl SendPacer for JitterDelay {
    async fn pause(&self) {
        let delay = self.next_delay();
        if delay.is_zero() {
            return;
        }
        debug!("waiting {:.1}s before next send", delay.as_secs_f64());
        tokio::time::sleep(delay).await;
    }
}

/// What gets posted into each target.
#[derive(Debug, Clone, Copy)]
pub enum Outgoing<'a> {
    Text(&'a str),
    Media {
        media: &'a MediaDescriptor,
        data: &'a [u8],
    },
}

impl<'a> Outgoing<'a> {
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Text(_) => MessageKind::Text,
            Self::Media { media, .. } => media.kind,
        }
    }

    fn media_payload(media: &'a MediaDescriptor, data: &'a [u8]) -> MediaPayload<'a> {
        let is_document = media.kind == MessageKind::Document;
        MediaPayload {
            kind: media.kind,
            data,
            caption: media.caption.as_deref(),
            mimetype: if is_document {
                media.mime_type.as_deref()
            } else {
                None
            },
            file_name: is_document.then(|| media.document_file_name()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub target: String,
    pub success: bool,
    /// Present iff `success`.
    pub message_id: Option<String>,
}

impl DispatchOutcome {
    pub fn delivered(target: String, message_id: String) -> Self {
        Self {
            target,
            success: true,
            message_id: Some(message_id),
        }
    }

    pub fn failed(target: String) -> Self {
        Self {
            target,
            success: false,
            message_id: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DispatchReport {
    /// One per target, in configured order.
    pub outcomes: Vec<DispatchOutcome>,
    pub success_count: usize,
    pub failure_count: usize,
    pub elapsed: Duration,
}

impl DispatchReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }
}

pub struct Dispatcher {
    pacer: Box<dyn SendPacer>,
}

impl Dispatcher {
    pub fn new(pacer: Box<dyn SendPacer>) -> Self {
        Self { pacer }
    }

    /// Deliver `message` to each target in order. A failed target is logged
    /// and counted; delivery carries on with the next one.
    pub async fn dispatch(
        &self,
        transport: &dyn Transport,
        message: Outgoing<'_>,
        targets: &[String],
    ) -> DispatchReport {
        let started = Instant::now();
        let mut outcomes = Vec::with_capacity(targets.len());

        for target in targets {
            let result = match message {
                Outgoing::Text(text) if text.is_empty() => {
                    debug!("empty text, nothing to send to {}", target);
                    outcomes.push(DispatchOutcome::failed(target.clone()));
                    continue;
                }
                Outgoing::Text(text) => {
                    self.pacer.pause().await;
                    transport.send_text(target, text).await
                }
                Outgoing::Media { media, data } => {
                    self.pacer.pause().await;
                    transport
                        .send_media(target, Outgoing::media_payload(media, data))
                        .await
                }
            };

            match result {
                Ok(message_id) => {
                    info!("copied {} to {}", message.kind(), target);
                    outcomes.push(DispatchOutcome::delivered(target.clone(), message_id));
                }
                Err(e) => {
                    error!("failed to copy {} to {}: {}", message.kind(), target, e);
                    outcomes.push(DispatchOutcome::failed(target.clone()));
                }
            }
        }

        let success_count = outcomes.iter().filter(|o| o.success).count();
        DispatchReport {
            failure_count: outcomes.len() - success_count,
            success_count,
            outcomes,
            elapsed: started.elapsed(),
        }
    }
}
