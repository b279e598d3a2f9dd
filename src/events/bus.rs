//! EventBus - Central event distribution for the CUPID Engine
//!
//! Provides a broadcast-based event bus for decoupled observability.
//! The engine emits events, and multiple observers can subscribe to
//! receive all events without blocking the emitter.
//!
//! # Design
//!
//! - Uses `tokio::sync::broadcast` for multi-producer, multi-consumer
//! - Non-blocking emit (fire-and-forget)
//! - Lagging receivers drop old events (no backpressure)
//! - Thread-safe via Clone (Arc internally)

use super::MatchEvent;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Default capacity for the event bus channel
pub const DEFAULT_CAPACITY: usize = 1024;

/// Central event bus for match-generation observability
///
/// The EventBus uses a broadcast channel to distribute events to all
/// subscribers. Emitting is non-blocking and fire-and-forget.
///
/// # Example
///
/// ```rust,ignore
/// use cupid::events::{EventBus, MatchEvent};
///
/// let bus = EventBus::new(1024);
/// let mut rx = bus.subscribe();
///
/// bus.emit(MatchEvent::generation_started("c1", 40));
///
/// while let Ok(event) = rx.recv().await {
///     println!("Event: {:?}", event);
/// }
/// ```
#[derive(Clone)]
pub struct EventBus {
    sender: Arc<broadcast::Sender<MatchEvent>>,
}

impl EventBus {
    /// Create a new EventBus with the specified capacity
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of events to buffer before old events
    ///   are dropped for lagging receivers
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Create an EventBus with default capacity (1024)
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Emit an event to all subscribers
    ///
    /// This is non-blocking and fire-and-forget. If there are no
    /// subscribers, the event is silently dropped.
    pub fn emit(&self, event: MatchEvent) {
        // Ignore send errors (no receivers)
        let _ = self.sender.send(event);
    }

    /// Subscribe to receive events
    ///
    /// Returns a receiver that will get all events emitted after
    /// subscription. If the receiver falls behind, old events are dropped.
    pub fn subscribe(&self) -> broadcast::Receiver<MatchEvent> {
        self.sender.subscribe()
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_with_capacity() {
        let bus = EventBus::new(100);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_clone_shares_channel() {
        let bus1 = EventBus::new(100);
        let _rx = bus1.subscribe();
        let bus2 = bus1.clone();
        assert_eq!(bus2.subscriber_count(), 1);
    }

    #[test]
    fn test_emit_without_subscribers_is_silent() {
        let bus = EventBus::new(100);
        bus.emit(MatchEvent::generation_started("c1", 0));
    }

    #[tokio::test]
    async fn test_subscriber_receives_emitted_events() {
        let bus = EventBus::new(100);
        let mut rx = bus.subscribe();
        bus.emit(MatchEvent::generation_started("c1", 3));
        match rx.recv().await.unwrap() {
            MatchEvent::GenerationStarted { total_users, .. } => assert_eq!(total_users, 3),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_multiple_subscribers_all_receive() {
        let bus = EventBus::new(100);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        bus.emit(MatchEvent::generation_started("c1", 5));
        assert!(rx1.recv().await.is_ok());
        assert!(rx2.recv().await.is_ok());
    }
}
