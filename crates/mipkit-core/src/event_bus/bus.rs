//! Event bus implementation.
//!
//! Synchronous callback registry plus a broadcast side channel. Handlers
//! are invoked on the publishing thread in registration order; polling
//! consumers (the UI event loop) can take a `broadcast::Receiver` instead.
//!
//! There is deliberately no process-global bus: one `EventBus` is created
//! per open project and handed to the managers by constructor injection.

use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::events::{AppEvent, EventCategory};

/// Subscription handle for unsubscribing from events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// Filter to receive only specific event types
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    /// Receive all events.
    #[default]
    All,
    /// Receive events matching any of these categories.
    Categories(Vec<EventCategory>),
}

impl EventFilter {
    /// Check if an event matches this filter
    pub fn matches(&self, event: &AppEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(&event.category()),
        }
    }
}

/// Type alias for event handler functions
type EventHandler = Box<dyn Fn(AppEvent) + Send + Sync>;

/// Error types for event bus operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum EventBusError {
    /// No subscribers are listening
    #[error("No active subscribers")]
    NoSubscribers,
}

/// Event bus for application-wide change notifications
pub struct EventBus {
    /// Broadcast channel sender for polling receivers
    sender: broadcast::Sender<AppEvent>,
    /// Registered synchronous handlers, invoked in registration order
    handlers: Arc<RwLock<Vec<(SubscriptionId, EventFilter, EventHandler)>>>,
}

impl EventBus {
    /// Create a new event bus with the default channel capacity
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create a new event bus with a custom broadcast capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            handlers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Publish an event to all subscribers
    ///
    /// Returns the number of broadcast receivers the event was queued for,
    /// or an error when nothing at all is listening.
    pub fn publish(&self, event: AppEvent) -> Result<usize, EventBusError> {
        let handlers = self.handlers.read();
        for (_, filter, handler) in handlers.iter() {
            if filter.matches(&event) {
                handler(event.clone());
            }
        }

        match self.sender.send(event) {
            Ok(count) => Ok(count),
            Err(_) => {
                if handlers.is_empty() {
                    Err(EventBusError::NoSubscribers)
                } else {
                    Ok(0)
                }
            }
        }
    }

    /// Subscribe to events with a synchronous handler
    ///
    /// The handler runs on the publishing thread, so it should return
    /// quickly to avoid blocking event dispatch. Re-entering a manager
    /// from inside a handler is not supported.
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(AppEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        let mut handlers = self.handlers.write();
        handlers.push((id, filter, Box::new(handler)));
        tracing::debug!("Subscription {} added", id);
        id
    }

    /// Get a receiver for manual event polling
    pub fn receiver(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    /// Unsubscribe from events
    ///
    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.write();
        let before = handlers.len();
        handlers.retain(|(sub_id, _, _)| *sub_id != id);
        let removed = handlers.len() != before;
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    /// Get the number of active subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ShapeKind;
    use crate::event_bus::events::{PointEvent, StateEvent};
    use crate::state::AppState;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn added_event(id: u32) -> AppEvent {
        AppEvent::Point(PointEvent::Added {
            id,
            x: 10,
            y: 20,
            shape: ShapeKind::Circle,
        })
    }

    #[test]
    fn test_event_bus_creation() {
        let bus = EventBus::new();
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_subscribe_and_unsubscribe() {
        let bus = EventBus::new();

        let id = bus.subscribe(EventFilter::All, |_| {});
        assert_eq!(bus.subscriber_count(), 1);

        assert!(bus.unsubscribe(id));
        assert_eq!(bus.subscriber_count(), 0);

        // Double unsubscribe should return false
        assert!(!bus.unsubscribe(id));
    }

    #[test]
    fn test_event_delivery() {
        let bus = EventBus::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();

        let _id = bus.subscribe(EventFilter::All, move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        bus.publish(added_event(1)).expect("Should publish");
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_event_filtering() {
        let bus = EventBus::new();
        let point_count = Arc::new(AtomicUsize::new(0));
        let state_count = Arc::new(AtomicUsize::new(0));

        let pc = point_count.clone();
        bus.subscribe(
            EventFilter::Categories(vec![EventCategory::Point]),
            move |_| {
                pc.fetch_add(1, Ordering::SeqCst);
            },
        );

        let sc = state_count.clone();
        bus.subscribe(
            EventFilter::Categories(vec![EventCategory::State]),
            move |_| {
                sc.fetch_add(1, Ordering::SeqCst);
            },
        );

        bus.publish(added_event(1)).ok();
        bus.publish(AppEvent::State(StateEvent::Changed {
            old: AppState::Initial,
            new: AppState::Edit,
        }))
        .ok();

        assert_eq!(point_count.load(Ordering::SeqCst), 1);
        assert_eq!(state_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handlers_run_in_registration_order() {
        let bus = EventBus::new();
        let order = Arc::new(RwLock::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = order.clone();
            bus.subscribe(EventFilter::All, move |_| {
                order.write().push(tag);
            });
        }

        bus.publish(added_event(1)).ok();
        assert_eq!(*order.read(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_filter_matches() {
        let event = added_event(1);

        assert!(EventFilter::All.matches(&event));
        assert!(EventFilter::Categories(vec![EventCategory::Point]).matches(&event));
        assert!(!EventFilter::Categories(vec![EventCategory::State]).matches(&event));
        assert!(
            EventFilter::Categories(vec![EventCategory::State, EventCategory::Point])
                .matches(&event)
        );
    }

    #[test]
    fn test_broadcast_receiver() {
        let bus = EventBus::new();
        let mut receiver = bus.receiver();

        bus.publish(added_event(42)).ok();

        let received = receiver.try_recv().expect("event queued");
        if let AppEvent::Point(PointEvent::Added { id, .. }) = received {
            assert_eq!(id, 42);
        } else {
            panic!("Wrong event received");
        }
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::new();
        assert!(matches!(
            bus.publish(added_event(1)),
            Err(EventBusError::NoSubscribers)
        ));
    }
}
