//! Subscriber capability
//!
//! Anything that wants to receive events from a topic implements
//! [`Subscriber`]. The bus and dispatcher never look inside a subscriber:
//! they hold its identity for topic membership and invoke the one handler
//! callback with each delivered copy.

use async_trait::async_trait;

use crate::event::Event;

/// Stable identity used for topic membership and handler lookup.
pub type SubscriberId = String;

/// Event consumer registered on one or more topics.
///
/// The handler runs on the dispatcher's single worker task, never in the
/// publisher's context, and deliveries are strictly FIFO across the whole
/// bus. Each invocation receives a private copy of the published event, so
/// the handler may freely consume or mutate it.
///
/// Handlers should not panic; a panic is caught and logged by the worker and
/// the delivery is abandoned, but the dispatch loop itself stays alive.
#[async_trait]
pub trait Subscriber: Send + Sync {
    /// Returns the identity this subscriber is tracked under.
    ///
    /// Must be non-empty and stable for the lifetime of the registration;
    /// two subscribers with the same id are treated as the same member.
    fn id(&self) -> SubscriberId;

    /// Handles one delivered event.
    ///
    /// The event's recipient field names this subscriber and its topic
    /// channel names the topic it was published on.
    async fn handle(&self, event: Event);
}
