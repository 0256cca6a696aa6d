//! Event bus façade
//!
//! [`EventBus`] owns the topic registry and the dispatcher. It is the single
//! synchronization point for topic mutation and publish fan-out: every
//! operation takes the one registry lock, so existence checks, membership
//! changes, and fan-out snapshots are atomic with respect to each other and
//! readers never observe a half-applied mutation.
//!
//! Publishing is synchronous up to the queue hand-off and asynchronous
//! afterwards: for each member of the topic at call time the bus addresses
//! an independent duplicate of the event and hands it to the dispatcher,
//! which delivers on its own worker. Enqueueing never blocks, so the
//! registry lock is never held across a wait.

pub mod topic;


use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::config::Settings;
use crate::dispatcher::{Delivery, Dispatcher};
use crate::event::Event;
use crate::subscriber::{Subscriber, SubscriberId};
use crate::utils::error::BusError;

use topic::Topic;

/// Bus-internal state: topic set plus the handler table. Both live behind
/// one lock so membership and handler lookups stay consistent.
#[derive(Default)]
struct Registry {
    topics: HashMap<String, Topic>,
    handlers: HashMap<SubscriberId, Arc<dyn Subscriber>>,
}

/// Topic-based publish/subscribe façade.
///
/// Cheap to share behind an `Arc`; all operations take `&self`. Creating a
/// bus spawns the dispatch worker, so a tokio runtime must be current.
pub struct EventBus {
    registry: Mutex<Registry>,
    dispatcher: Dispatcher,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_settings(&Settings::default())
    }

    pub fn with_settings(settings: &Settings) -> Self {
        Self {
            registry: Mutex::new(Registry::default()),
            dispatcher: Dispatcher::new(settings.dispatcher.queue_capacity),
        }
    }

    /// Snapshot of the registered topic names, in no particular order.
    pub fn available_topics(&self) -> HashSet<String> {
        let registry = self.registry.lock().unwrap();
        registry.topics.keys().cloned().collect()
    }

    /// True if `subscriber` is currently a member of the topic.
    pub fn is_subscribed(
        &self,
        subscriber: &dyn Subscriber,
        topic_channel: &str,
    ) -> Result<bool, BusError> {
        let id = subscriber_id(subscriber)?;
        require_topic_name(topic_channel)?;

        let registry = self.registry.lock().unwrap();
        let topic = registry
            .topics
            .get(topic_channel)
            .ok_or_else(|| BusError::NoSuchTopic(topic_channel.to_string()))?;
        Ok(topic.contains(&id))
    }

    /// Names of all topics the subscriber belongs to.
    ///
    /// Never fails: an unknown subscriber simply has no subscriptions.
    pub fn subscriptions_of(&self, subscriber: &dyn Subscriber) -> Vec<String> {
        let id = subscriber.id();
        if id.is_empty() {
            return Vec::new();
        }

        let registry = self.registry.lock().unwrap();
        registry
            .topics
            .iter()
            .filter(|(_, topic)| topic.contains(&id))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Adds the subscriber to the topic's membership.
    ///
    /// Returns true if newly added, false if it was already a member. The
    /// handler reference is (re)stored either way, so re-subscribing with a
    /// fresh instance under the same id swaps the handler in.
    pub fn subscribe(
        &self,
        subscriber: Arc<dyn Subscriber>,
        topic_channel: &str,
    ) -> Result<bool, BusError> {
        let id = subscriber_id(subscriber.as_ref())?;
        require_topic_name(topic_channel)?;

        let mut registry = self.registry.lock().unwrap();
        let added = match registry.topics.get_mut(topic_channel) {
            Some(topic) => topic.subscribe(id.clone()),
            None => return Err(BusError::NoSuchTopic(topic_channel.to_string())),
        };
        registry.handlers.insert(id.clone(), subscriber);

        debug!(subscriber = %id, topic = %topic_channel, added, "subscribe");
        Ok(added)
    }

    /// Removes the subscriber from the topic's membership.
    ///
    /// Returns true if removed, false if it was not a member. The handler
    /// reference is dropped once the last membership disappears.
    pub fn unsubscribe(
        &self,
        subscriber: &dyn Subscriber,
        topic_channel: &str,
    ) -> Result<bool, BusError> {
        let id = subscriber_id(subscriber)?;
        require_topic_name(topic_channel)?;

        let mut registry = self.registry.lock().unwrap();
        let removed = match registry.topics.get_mut(topic_channel) {
            Some(topic) => topic.unsubscribe(&id),
            None => return Err(BusError::NoSuchTopic(topic_channel.to_string())),
        };
        if removed && !registry.topics.values().any(|topic| topic.contains(&id)) {
            registry.handlers.remove(&id);
        }

        debug!(subscriber = %id, topic = %topic_channel, removed, "unsubscribe");
        Ok(removed)
    }

    /// Registers a new, empty topic under `name`.
    pub fn create_topic(&self, name: &str) -> Result<(), BusError> {
        require_topic_name(name)?;

        let mut registry = self.registry.lock().unwrap();
        if registry.topics.contains_key(name) {
            return Err(BusError::TopicNameUnavailable(name.to_string()));
        }
        registry.topics.insert(name.to_string(), Topic::new(name));

        debug!(topic = %name, "topic created");
        Ok(())
    }

    /// Removes the topic and discards its membership immediately.
    ///
    /// Copies already queued for delivery carry their own addressing and
    /// are unaffected.
    pub fn delete_topic(&self, name: &str) -> Result<(), BusError> {
        require_topic_name(name)?;

        let mut registry = self.registry.lock().unwrap();
        let topic = registry
            .topics
            .remove(name)
            .ok_or_else(|| BusError::NoSuchTopic(name.to_string()))?;
        for id in topic.subscribers() {
            if !registry.topics.values().any(|t| t.contains(id)) {
                registry.handlers.remove(id);
            }
        }

        debug!(topic = %name, "topic deleted");
        Ok(())
    }

    /// Unconditionally clears the whole registry.
    pub fn delete_all_topics(&self) {
        let mut registry = self.registry.lock().unwrap();
        registry.topics.clear();
        registry.handlers.clear();

        debug!("all topics deleted");
    }

    /// Publishes `event` to every current member of the topic.
    ///
    /// Each member gets its own value-independent duplicate with `recipient`
    /// set to that member and `topic_channel` set to the topic name, queued
    /// for asynchronous delivery in membership-iteration order. If the
    /// dispatcher rejects a copy the call fails with
    /// [`BusError::UnableToQueueEvent`] and the remaining fan-out is
    /// abandoned; copies already queued are still delivered
    /// (at-least-once-attempted, not atomic).
    pub fn publish(&self, event: Event, topic_channel: &str) -> Result<(), BusError> {
        require_topic_name(topic_channel)?;

        let registry = self.registry.lock().unwrap();
        let topic = registry
            .topics
            .get(topic_channel)
            .ok_or_else(|| BusError::NoSuchTopic(topic_channel.to_string()))?;

        let mut event = event;
        event.set_topic_channel(topic_channel);
        event.set_timestamp_ms(chrono::Utc::now().timestamp_millis());

        for id in topic.subscribers() {
            let Some(handler) = registry.handlers.get(id) else {
                // membership without a handler cannot arise through the
                // public API
                warn!(subscriber = %id, topic = %topic_channel, "member has no handler, skipped");
                continue;
            };
            let mut copy = event.duplicate();
            copy.set_recipient(id.clone());
            let delivery = Delivery {
                event: copy,
                recipient: Arc::clone(handler),
            };
            if !self.dispatcher.enqueue(delivery) {
                return Err(BusError::UnableToQueueEvent);
            }
        }
        Ok(())
    }

    /// Stops the dispatch worker; see [`Dispatcher::terminate`].
    pub fn shutdown(&self, interrupt: bool) -> bool {
        self.dispatcher.terminate(interrupt)
    }

    /// True while the dispatch worker is alive.
    pub fn is_dispatching(&self) -> bool {
        self.dispatcher.is_running()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

fn subscriber_id(subscriber: &dyn Subscriber) -> Result<SubscriberId, BusError> {
    let id = subscriber.id();
    if id.is_empty() {
        return Err(BusError::InvalidArgument("subscriber id must not be empty"));
    }
    Ok(id)
}

fn require_topic_name(topic_channel: &str) -> Result<(), BusError> {
    if topic_channel.is_empty() {
        return Err(BusError::InvalidArgument("topic name must not be empty"));
    }
    Ok(())
}
