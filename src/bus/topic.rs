//! Topic membership
//!
//! A [`Topic`] is a named, unordered set of subscriber identities. It holds
//! identities only, never handler references; in-flight events carry their
//! own addressing, so a topic can be dropped at any time without per-topic
//! cleanup. Callers synchronize access through the bus registry lock.

use std::collections::HashSet;

use crate::subscriber::SubscriberId;

/// Named subscriber group that events are published against.
#[derive(Debug, Default)]
pub struct Topic {
    name: String,
    subscribers: HashSet<SubscriberId>,
}

impl Topic {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            subscribers: HashSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a member; returns false if it was already subscribed.
    pub fn subscribe(&mut self, id: SubscriberId) -> bool {
        self.subscribers.insert(id)
    }

    /// Removes a member; returns false if it was not subscribed.
    pub fn unsubscribe(&mut self, id: &SubscriberId) -> bool {
        self.subscribers.remove(id)
    }

    pub fn contains(&self, id: &SubscriberId) -> bool {
        self.subscribers.contains(id)
    }

    /// Current members, in no particular order.
    pub fn subscribers(&self) -> impl Iterator<Item = &SubscriberId> {
        self.subscribers.iter()
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}
