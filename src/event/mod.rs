//! Event envelope
//!
//! An [`Event`] is the unit of publication: a producer-defined payload plus
//! the addressing the bus stamps on it at publish time (topic channel,
//! recipient, timestamp). The bus never inspects the payload; it only
//! requires the ability to duplicate it so that every subscriber gets a
//! value-independent copy.

use std::any::Any;
use std::fmt;

use uuid::Uuid;

use crate::subscriber::SubscriberId;

#[cfg(test)]
mod tests;

/// Producer-defined event content.
///
/// Implemented automatically for any `Clone + Send + 'static` type. The
/// duplicate produced by [`Payload::duplicate`] must be value-independent:
/// mutating one subscriber's copy must not be visible in another's. Plain
/// owned data gets this from `Clone`; a payload that embeds `Arc`/`Rc`
/// shares that state across copies and should only do so deliberately.
pub trait Payload: Send {
    /// Produces an independently owned copy of this payload.
    fn duplicate(&self) -> Box<dyn Payload>;

    /// Upcast for downcasting to the concrete payload type.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for in-place access to the concrete payload type.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T> Payload for T
where
    T: Clone + Send + 'static,
{
    fn duplicate(&self) -> Box<dyn Payload> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A publishable message with its delivery addressing.
///
/// Constructed by the producer around a payload; the addressing fields stay
/// empty until [`EventBus::publish`](crate::bus::EventBus::publish) stamps
/// them. Each subscriber receives its own [`Event::duplicate`] with
/// `recipient` set to that subscriber alone.
pub struct Event {
    event_id: String,
    recipient: Option<SubscriberId>,
    topic_channel: Option<String>,
    timestamp_ms: i64,
    payload: Box<dyn Payload>,
}

impl Event {
    /// Wraps a payload in a fresh, unaddressed event.
    pub fn new(payload: impl Payload + 'static) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            recipient: None,
            topic_channel: None,
            timestamp_ms: 0,
            payload: Box::new(payload),
        }
    }

    /// Unique id of this event instance.
    ///
    /// Every duplicate gets its own id, so each delivered copy is
    /// individually identifiable.
    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    /// Identity of the subscriber this copy is addressed to, once queued.
    pub fn recipient(&self) -> Option<&SubscriberId> {
        self.recipient.as_ref()
    }

    /// Name of the topic this instance was published on.
    pub fn topic_channel(&self) -> Option<&str> {
        self.topic_channel.as_deref()
    }

    /// Publish time in Unix milliseconds; 0 before publication.
    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp_ms
    }

    /// Borrows the payload as a trait object.
    pub fn payload(&self) -> &dyn Payload {
        self.payload.as_ref()
    }

    /// Downcasts the payload to its concrete type.
    pub fn payload_as<T: 'static>(&self) -> Option<&T> {
        self.payload.as_any().downcast_ref::<T>()
    }

    /// Mutable downcast of the payload to its concrete type.
    pub fn payload_as_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.payload.as_any_mut().downcast_mut::<T>()
    }

    /// Produces a value-independent copy with a fresh event id.
    ///
    /// Addressing fields carry over; the payload is duplicated through its
    /// [`Payload`] capability.
    pub fn duplicate(&self) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            recipient: self.recipient.clone(),
            topic_channel: self.topic_channel.clone(),
            timestamp_ms: self.timestamp_ms,
            payload: self.payload.duplicate(),
        }
    }

    pub(crate) fn set_recipient(&mut self, recipient: SubscriberId) {
        self.recipient = Some(recipient);
    }

    pub(crate) fn set_topic_channel(&mut self, topic_channel: &str) {
        self.topic_channel = Some(topic_channel.to_string());
    }

    pub(crate) fn set_timestamp_ms(&mut self, timestamp_ms: i64) {
        self.timestamp_ms = timestamp_ms;
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("event_id", &self.event_id)
            .field("recipient", &self.recipient)
            .field("topic_channel", &self.topic_channel)
            .field("timestamp_ms", &self.timestamp_ms)
            .finish_non_exhaustive()
    }
}
