use lru::LruCache;
use std::num::NonZeroUsize;

/// Remembers which inbound event ids have already entered the pipeline.
///
/// Bounded: once `capacity` ids are held, accepting a new one forgets the
/// least recently accepted id.
pub struct DedupFilter {
    seen: LruCache<String, ()>,
}

impl DedupFilter {
    pub fn new(capacity: usize) -> Self {
        Self {
            seen: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
        }
    }

    /// True the first time `event_id` is seen, false on every later call.
    pub fn accept(&mut self, event_id: &str) -> bool {
        if self.seen.contains(event_id) {
            return false;
        }
        self.seen.put(event_id.to_string(), ());
        true
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.seen.len()
    }
}
