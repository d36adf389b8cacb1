//! Event Bus for broadcasting booking events to subscribers
//!
//! Uses tokio broadcast channel for pub/sub pattern.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::types::{Event, EventMessage};

/// Default channel capacity
const DEFAULT_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventMessage>,
    subscriber_count: Arc<AtomicUsize>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            subscriber_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Publish an event to all subscribers. Having no subscriber is normal.
    pub fn publish(&self, event: Event) {
        let message = EventMessage::new(event);
        let event_type = message.event.event_type();
        let resource_id = message.event.resource_id().to_string();

        match self.sender.send(message) {
            Ok(receivers) => debug!(event_type, %resource_id, receivers, "Event published"),
            Err(_) => debug!(event_type, %resource_id, "Event published (no subscribers)"),
        }
    }

    pub fn subscribe(&self) -> EventSubscriber {
        let receiver = self.sender.subscribe();
        let count = self.subscriber_count.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(subscribers = count, "New event subscriber");

        EventSubscriber {
            receiver,
            subscriber_count: self.subscriber_count.clone(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriber_count.load(Ordering::SeqCst)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

pub struct EventSubscriber {
    receiver: broadcast::Receiver<EventMessage>,
    subscriber_count: Arc<AtomicUsize>,
}

impl EventSubscriber {
    /// Receive the next event; `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<EventMessage> {
        loop {
            match self.receiver.recv().await {
                Ok(msg) => return Some(msg),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!(missed, "Event subscriber lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Next event if one is already queued
    pub fn try_recv(&mut self) -> Option<EventMessage> {
        loop {
            match self.receiver.try_recv() {
                Ok(msg) => return Some(msg),
                Err(broadcast::error::TryRecvError::Lagged(missed)) => {
                    warn!(missed, "Event subscriber lagged");
                    continue;
                }
                Err(_) => return None,
            }
        }
    }
}

impl Drop for EventSubscriber {
    fn drop(&mut self) {
        self.subscriber_count.fetch_sub(1, Ordering::SeqCst);
    }
}

pub type SharedEventBus = Arc<EventBus>;

pub fn create_event_bus() -> SharedEventBus {
    Arc::new(EventBus::new())
}
