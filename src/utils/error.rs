//! Error types surfaced by the event bus.
//!
//! Every condition here is caller-facing and raised synchronously by the
//! operation that triggered it; the bus never retries on the caller's
//! behalf. Internal worker wake-ups while waiting for the next event are
//! not errors and never reach a caller.

use thiserror::Error;

/// Failures raised by bus operations.
#[non_exhaustive]
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BusError {
    /// The operation referenced a topic name that is not registered.
    #[error("no such topic: {0}")]
    NoSuchTopic(String),

    /// A topic with the requested name already exists.
    #[error("topic name unavailable: {0}")]
    TopicNameUnavailable(String),

    /// The dispatcher's delivery queue rejected an event, either because it
    /// is at capacity or because the dispatcher has shut down. A publish
    /// that hits this mid-fan-out does not roll back copies already queued.
    #[error("unable to queue event for delivery")]
    UnableToQueueEvent,

    /// A required argument was missing or empty.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

impl BusError {
    /// Returns a short stable label (snake_case) for use in log fields.
    pub fn as_label(&self) -> &'static str {
        match self {
            BusError::NoSuchTopic(_) => "no_such_topic",
            BusError::TopicNameUnavailable(_) => "topic_name_unavailable",
            BusError::UnableToQueueEvent => "unable_to_queue_event",
            BusError::InvalidArgument(_) => "invalid_argument",
        }
    }
}
