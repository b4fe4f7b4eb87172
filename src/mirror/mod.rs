//! The mirroring engine: one source group fanned out to many targets, with
//! later edits and deletes replayed onto the copies.

pub mod classify;
pub mod dedup;
pub mod dispatch;
pub mod mapping;
pub mod reconcile;
pub mod stage;
pub mod summary;

pub use classify::{ClassifiedMessage, MediaDescriptor, MessageKind, classify};
pub use dedup::DedupFilter;
pub use dispatch::{DispatchOutcome, DispatchReport, Dispatcher, JitterDelay, Outgoing, SendPacer};
pub use mapping::{MappingEntry, MappingTable, MirroredCopy};
pub use reconcile::{ReplayReport, UpdateAction};
pub use stage::{MediaStager, StagedMedia};

use crate::bus::{BusEvent, ConnectionEvent, InboundEvent, MessageUpdate};
use crate::config::Config;
use crate::transport::Transport;
use std::sync::Arc;
use summary::{DeliveryStats, compose_summary, post_summary};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// How handling one inbound message ended.
#[derive(Debug)]
pub enum MessageOutcome {
    /// Not from the trigger group, sent by us, or empty.
    Filtered,
    Duplicate,
    Unsupported,
    DownloadFailed,
    Mirrored(DispatchReport),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Ignored,
    /// The source message has no recorded copies.
    Unmapped,
    Edited(ReplayReport),
    Deleted(ReplayReport),
}

/// Owns all mirroring state. Events are handled one at a time through
/// `&mut self`, so dedup and mapping writes never interleave.
pub struct MirrorEngine {
    trigger_group_id: String,
    target_group_ids: Vec<String>,
    transport: Arc<dyn Transport>,
    dedup: DedupFilter,
    mapping: MappingTable,
    dispatcher: Dispatcher,
    stager: MediaStager,
}

impl MirrorEngine {
    pub fn new(config: &Config, transport: Arc<dyn Transport>) -> Self {
        Self {
            trigger_group_id: config.trigger_group_id.clone(),
            target_group_ids: config.target_group_ids.clone(),
            transport,
            dedup: DedupFilter::new(config.retention.dedup_capacity),
            mapping: MappingTable::new(config.retention.mapping_capacity),
            dispatcher: Dispatcher::new(Box::new(JitterDelay::from_config(&config.dispatch))),
            stager: MediaStager::new(
                config.media.temp_dir.clone(),
                config.media.max_download_bytes,
            ),
        }
    }

    /// Replace the inter-send pacing policy.
    #[must_use]
    pub fn with_pacer(mut self, pacer: Box<dyn SendPacer>) -> Self {
        self.dispatcher = Dispatcher::new(pacer);
        self
    }

    /// Recorded copies of `source_id`, if it was mirrored.
    pub fn mapping_for(&mut self, source_id: &str) -> Option<MappingEntry> {
        self.mapping.lookup(source_id)
    }

    /// Consume events in arrival order until every publisher is gone.
    pub async fn run(mut self, mut rx: mpsc::Receiver<BusEvent>) {
        info!(
            "mirror engine started: {} -> {} target groups",
            self.trigger_group_id,
            self.target_group_ids.len()
        );
        while let Some(event) = rx.recv().await {
            self.handle_event(event).await;
        }
        info!("event queue closed, mirror engine stopping");
    }

    pub async fn handle_event(&mut self, event: BusEvent) {
        match event {
            BusEvent::Message(msg) => {
                self.handle_message(&msg).await;
            }
            BusEvent::Update(update) => {
                self.handle_update(&update).await;
            }
            BusEvent::Connection(conn) => log_connection(&conn),
        }
    }

    pub async fn handle_message(&mut self, event: &InboundEvent) -> MessageOutcome {
        let Some(content) = event.message.as_ref() else {
            return MessageOutcome::Filtered;
        };
        if event.chat_id != self.trigger_group_id || event.from_me {
            return MessageOutcome::Filtered;
        }
        if !self.dedup.accept(&event.id) {
            debug!("event {} already processed, skipping", event.id);
            return MessageOutcome::Duplicate;
        }
        info!(
            "new message {} in trigger group from {}",
            event.id,
            event.sender_name()
        );

        let classified = classify(content);
        if !classified.is_supported() {
            info!("ignoring message {} of unsupported type", event.id);
            return MessageOutcome::Unsupported;
        }
        debug!("message {} classified as {}", event.id, classified.kind);

        // Held until the fan-out round ends; dropping it removes the temp file.
        let staged = match classified.media.as_ref() {
            Some(media) => {
                match self
                    .stager
                    .stage(&event.id, media, self.transport.as_ref())
                    .await
                {
                    Ok(staged) => Some(staged),
                    Err(e) => {
                        error!("media download for {} failed, aborting: {}", event.id, e);
                        return MessageOutcome::DownloadFailed;
                    }
                }
            }
            None => None,
        };

        let outgoing = match (classified.media.as_ref(), staged.as_ref()) {
            (Some(media), Some(staged)) => Outgoing::Media {
                media,
                data: &staged.data,
            },
            _ => Outgoing::Text(classified.text.as_deref().unwrap_or_default()),
        };
        let report = self
            .dispatcher
            .dispatch(self.transport.as_ref(), outgoing, &self.target_group_ids)
            .await;
        drop(staged);

        self.mapping.record(&event.id, &report.outcomes);

        let text = compose_summary(
            event.sender_name(),
            classified.kind,
            DeliveryStats {
                success: report.success_count,
                failure: report.failure_count,
                total: report.total(),
                elapsed: report.elapsed,
            },
            &chrono::Local::now(),
        );
        post_summary(self.transport.as_ref(), &self.trigger_group_id, &text).await;

        MessageOutcome::Mirrored(report)
    }

    pub async fn handle_update(&mut self, update: &MessageUpdate) -> UpdateOutcome {
        if update.chat_id != self.trigger_group_id {
            return UpdateOutcome::Ignored;
        }

        let action = UpdateAction::detect(&update.update);
        if action == UpdateAction::Ignore {
            debug!("update for {} carries no edit or delete", update.id);
            return UpdateOutcome::Ignored;
        }
        let Some(entry) = self.mapping.lookup(&update.id) else {
            info!("no mirrored copies of {}, skipping update", update.id);
            return UpdateOutcome::Unmapped;
        };

        match action {
            UpdateAction::Edit(text) => {
                info!("message {} edited, updating {} copies", update.id, entry.len());
                let report = reconcile::replay_edit(self.transport.as_ref(), &entry, &text).await;
                UpdateOutcome::Edited(report)
            }
            UpdateAction::Delete => {
                info!("message {} deleted, removing {} copies", update.id, entry.len());
                let report = reconcile::replay_delete(self.transport.as_ref(), &entry).await;
                UpdateOutcome::Deleted(report)
            }
            UpdateAction::Ignore => UpdateOutcome::Ignored,
        }
    }
}

fn log_connection(event: &ConnectionEvent) {
    match event.state.as_str() {
        "open" => info!("bridge connected to WhatsApp"),
        "close" => warn!(
            "bridge connection closed: {}",
            event.reason.as_deref().unwrap_or("no reason given")
        ),
        other => debug!("bridge connection state: {}", other),
    }
}
