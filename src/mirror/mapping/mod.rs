//! Source message id → where its mirrors ended up.

use crate::mirror::dispatch::DispatchOutcome;
use lru::LruCache;
use std::num::NonZeroUsize;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirroredCopy {
    pub chat_id: String,
    pub message_id: String,
}

/// Every successful delivery of one source message, in configured target order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    pub copies: Vec<MirroredCopy>,
}

impl MappingEntry {
    pub fn len(&self) -> usize {
        self.copies.len()
    }
}

pub struct MappingTable {
    entries: LruCache<String, MappingEntry>,
}

impl MappingTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
        }
    }

    /// Write the entry for `source_id` from the successful outcomes of a
    /// completed fan-out round. Entries are written once; returns whether
    /// anything was stored.
    pub fn record(&mut self, source_id: &str, outcomes: &[DispatchOutcome]) -> bool {
        if self.entries.contains(source_id) {
            warn!("mapping for {} already recorded, ignoring rewrite", source_id);
            return false;
        }
        let copies: Vec<MirroredCopy> = outcomes
            .iter()
            .filter(|o| o.success)
            .filter_map(|o| {
                o.message_id.as_ref().map(|id| MirroredCopy {
                    chat_id: o.target.clone(),
                    message_id: id.clone(),
                })
            })
            .collect();
        if copies.is_empty() {
            debug!("no successful copies of {}, nothing to map", source_id);
            return false;
        }
        debug!("mapped {} to {} copies", source_id, copies.len());
        self.entries
            .put(source_id.to_string(), MappingEntry { copies });
        true
    }

    /// Returns a copy of the entry; a miss is normal for messages that were
    /// never mirrored or predate this process.
    pub fn lookup(&mut self, source_id: &str) -> Option<MappingEntry> {
        self.entries.get(source_id).cloned()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
