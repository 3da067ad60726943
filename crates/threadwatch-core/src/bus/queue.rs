//! Async event bus between the gateway subscriber and the relay loop.
//!
//! Uses a tokio::sync::mpsc bounded channel. The gateway publishes
//! `ThreadCreatedEvent`s, the relay consumes them one at a time.

use super::types::ThreadCreatedEvent;
use tokio::sync::mpsc;

/// Single-lane bus of thread-created events.
pub struct EventBus {
    tx: mpsc::Sender<ThreadCreatedEvent>,
    rx: tokio::sync::Mutex<mpsc::Receiver<ThreadCreatedEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given buffer capacity.
    pub fn new(buffer_size: usize) -> Self {
        let (tx, rx) = mpsc::channel(buffer_size);

        EventBus {
            tx,
            rx: tokio::sync::Mutex::new(rx),
        }
    }

    /// Publish a thread event (gateway side).
    pub async fn publish(
        &self,
        event: ThreadCreatedEvent,
    ) -> Result<(), mpsc::error::SendError<ThreadCreatedEvent>> {
        self.tx.send(event).await
    }

    /// Consume the next event (blocks until available).
    /// Returns None if all senders are dropped.
    pub async fn consume(&self) -> Option<ThreadCreatedEvent> {
        let mut rx = self.rx.lock().await;
        rx.recv().await
    }

    /// Get a clone of the sender.
    pub fn sender(&self) -> mpsc::Sender<ThreadCreatedEvent> {
        self.tx.clone()
    }
}
