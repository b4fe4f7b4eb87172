use crate::bus::BusEvent;
use crate::errors::GroupSyncError;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

const DEFAULT_CAPACITY: usize = 1000;
/// Timeout for publishing so a stalled engine cannot block ingress forever.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Ordered, bounded, single-consumer queue between ingress and the mirror engine.
///
/// Every inbound event goes through here, so the engine sees them one at a time
/// in arrival order and finishes each before starting the next.
pub struct EventQueue {
    tx: mpsc::Sender<BusEvent>,
    rx: Option<mpsc::Receiver<BusEvent>>,
}

impl EventQueue {
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        Self { tx, rx: Some(rx) }
    }

    /// A cloneable handle for producers.
    pub fn publisher(&self) -> EventPublisher {
        EventPublisher {
            tx: self.tx.clone(),
        }
    }

    /// Extract the receiver. There is exactly one consumer, so this succeeds once.
    pub fn take_receiver(&mut self) -> Option<mpsc::Receiver<BusEvent>> {
        self.rx.take()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[derive(Clone)]
pub struct EventPublisher {
    tx: mpsc::Sender<BusEvent>,
}

impl EventPublisher {
    pub async fn publish(&self, event: BusEvent) -> Result<(), GroupSyncError> {
        let kind = event.kind();
        // Use timeout to prevent indefinite blocking when consumer is slow
        tokio::time::timeout(SEND_TIMEOUT, self.tx.send(event))
            .await
            .map_err(|_| {
                warn!(
                    "event publish timed out after {}s, queue full or engine stalled",
                    SEND_TIMEOUT.as_secs()
                );
                GroupSyncError::Queue("publish timed out, queue full".into())
            })?
            .map_err(|_| GroupSyncError::Queue("receiver closed".into()))?;
        debug!("{} event queued", kind);
        Ok(())
    }
}
