//! Retained event store: last event per exact topic.

use std::collections::HashMap;

use topicbus_core::Event;

/// At most one entry per distinct topic string, last-write-wins. Keyed by
/// literal topic, never by pattern: a wildcard subscriber is not replayed
/// unless its raw pattern string happens to equal a retained key.
pub(crate) struct RetainedStore<P> {
    entries: HashMap<String, Event<P>>,
}

impl<P> RetainedStore<P> {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub(crate) fn put(&mut self, topic: String, event: Event<P>) {
        self.entries.insert(topic, event);
    }

    pub(crate) fn get(&self, topic: &str) -> Option<&Event<P>> {
        self.entries.get(topic)
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
