//! In-process domain event bus.
//!
//! Uses tokio::sync::broadcast to fan-out events to every listener
//! (attachment cleanup, activity consumers). Publishing never blocks and never
//! fails: delivery is at-most-once.

use tokio::sync::broadcast;
use tracing::debug;

use crate::models::{DomainEvent, EventMessage};

/// Default capacity for the broadcast channel.
const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// Fire-and-forget sink for domain events.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: DomainEvent);
}

/// Event bus that distributes events to all subscribed listeners.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventMessage>,
}

impl EventBus {
    /// Create a new EventBus with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new EventBus with a specific capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to receive events.
    /// Returns a receiver that will receive all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<EventMessage> {
        self.sender.subscribe()
    }

    /// Broadcast an event to all subscribers.
    /// Returns the number of receivers that received the event.
    /// If there are no subscribers, returns 0 (does not error).
    pub fn send(&self, event: DomainEvent) -> usize {
        let name = event.name();
        let receivers = self.sender.send(EventMessage::new(event)).unwrap_or(0);
        debug!("Published {} event to {} listeners", name, receivers);
        receivers
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventPublisher for EventBus {
    fn publish(&self, event: DomainEvent) {
        self.send(event);
    }
}
