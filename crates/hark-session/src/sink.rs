//! Event fan-out to the host bridge.
//!
//! Two independent broadcast channels: lifecycle status changes and raw
//! recognition events. `publish` is fire-and-forget and never blocks; with no
//! subscriber attached the event is dropped, not queued, so a late subscriber
//! only sees events emitted after it subscribed.

use tokio::sync::broadcast;

use hark_core::events::{LifecycleEvent, RecognitionEvent};

/// The lifecycle/recognition sink pair for one session.
#[derive(Debug, Clone)]
pub struct EventSinks {
    lifecycle_tx: broadcast::Sender<LifecycleEvent>,
    recognition_tx: broadcast::Sender<RecognitionEvent>,
}

impl EventSinks {
    /// Create a sink pair with the given per-channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (lifecycle_tx, _) = broadcast::channel(capacity.max(1));
        let (recognition_tx, _) = broadcast::channel(capacity.max(1));
        Self {
            lifecycle_tx,
            recognition_tx,
        }
    }

    /// Subscribe to lifecycle events. No replay of earlier events.
    pub fn subscribe_lifecycle(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.lifecycle_tx.subscribe()
    }

    /// Subscribe to recognition events. No replay of earlier events.
    pub fn subscribe_recognition(&self) -> broadcast::Receiver<RecognitionEvent> {
        self.recognition_tx.subscribe()
    }

    /// Publish a lifecycle event. Dropped if no subscriber is attached.
    pub fn publish_lifecycle(&self, event: LifecycleEvent) {
        tracing::debug!(event = event.event_name(), "Lifecycle event");
        if self.lifecycle_tx.send(event).is_err() {
            tracing::trace!("No lifecycle subscriber; event dropped");
        }
    }

    /// Publish a recognition event. Dropped if no subscriber is attached.
    pub fn publish_recognition(&self, event: RecognitionEvent) {
        if self.recognition_tx.send(event).is_err() {
            tracing::trace!("No recognition subscriber; event dropped");
        }
    }
}

impl Default for EventSinks {
    fn default() -> Self {
        Self::new(256)
    }
}
