//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`BookingEvent`]s. It is
//! shared via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use hytte_core::types::DbId;

// ---------------------------------------------------------------------------
// BookingEvent
// ---------------------------------------------------------------------------

/// A domain event emitted by a write path after its transaction commits.
///
/// Constructed via [`BookingEvent::new`] and enriched with the builder
/// methods [`with_cabin`](BookingEvent::with_cabin),
/// [`with_booking`](BookingEvent::with_booking),
/// [`with_actor`](BookingEvent::with_actor), and
/// [`with_payload`](BookingEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingEvent {
    /// Dot-separated event name, e.g. `"booking.created"`.
    pub event_type: String,

    /// The cabin the event concerns.
    pub cabin_id: Option<DbId>,

    /// The booking the event concerns, when there is one.
    pub booking_id: Option<DbId>,

    /// Id of the user that triggered the event; `None` for anonymous
    /// guests.
    pub actor_user_id: Option<DbId>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl BookingEvent {
    /// Create a new event with only the required `event_type`.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            cabin_id: None,
            booking_id: None,
            actor_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_cabin(mut self, cabin_id: DbId) -> Self {
        self.cabin_id = Some(cabin_id);
        self
    }

    pub fn with_booking(mut self, booking_id: DbId) -> Self {
        self.booking_id = Some(booking_id);
        self
    }

    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`BookingEvent`].
pub struct EventBus {
    sender: broadcast::Sender<BookingEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are
    /// dropped and slow receivers observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With zero subscribers the event is silently dropped; notification
    /// delivery is best-effort by contract.
    pub fn publish(&self, event: BookingEvent) {
        // Ignore the SendError, it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<BookingEvent> {
        self.sender.subscribe()
    }

    /// Number of active subscribers.
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(
            BookingEvent::new("booking.created")
                .with_cabin(1)
                .with_booking(42)
                .with_actor(7),
        );

        let event = rx.recv().await.unwrap();
        assert_eq!(event.event_type, "booking.created");
        assert_eq!(event.cabin_id, Some(1));
        assert_eq!(event.booking_id, Some(42));
        assert_eq!(event.actor_user_id, Some(7));
    }

    #[test]
    fn publish_without_subscribers_is_a_no_op() {
        let bus = EventBus::default();
        assert_eq!(bus.receiver_count(), 0);
        bus.publish(BookingEvent::new("booking.cancelled"));
    }

    #[tokio::test]
    async fn multiple_subscribers_each_get_every_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(BookingEvent::new("booking.approved"));

        assert_eq!(rx1.recv().await.unwrap().event_type, "booking.approved");
        assert_eq!(rx2.recv().await.unwrap().event_type, "booking.approved");
    }
}
