//! Listener registry: identity, once-ness, and record storage.

use std::collections::HashMap;

use topicbus_core::SharedListener;

/// Identifier of one registered listener.
///
/// Allocated monotonically per bus instance and never reused, even after
/// removal, so a removed id cannot alias a future registration. Not
/// reset by `clear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    #[cfg(test)]
    pub(crate) fn from_raw(raw: u64) -> Self {
        ListenerId(raw)
    }
}

/// Everything the registry knows about one listener. The trie only holds
/// the id; the record owns the callback, the once flag, and the pattern
/// segments needed to find the id's node again on removal.
pub(crate) struct ListenerRecord<P, R> {
    pub(crate) callback: SharedListener<P, R>,
    pub(crate) once: bool,
    pub(crate) segments: Vec<String>,
}

pub(crate) struct Registry<P, R> {
    records: HashMap<ListenerId, ListenerRecord<P, R>>,
    next_id: u64,
}

impl<P, R> Registry<P, R> {
    pub(crate) fn new() -> Self {
        Self {
            records: HashMap::new(),
            next_id: 0,
        }
    }

    pub(crate) fn allocate(&mut self) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn insert(&mut self, id: ListenerId, record: ListenerRecord<P, R>) {
        self.records.insert(id, record);
    }

    pub(crate) fn get(&self, id: ListenerId) -> Option<&ListenerRecord<P, R>> {
        self.records.get(&id)
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> Option<ListenerRecord<P, R>> {
        self.records.remove(&id)
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    /// Drop every record. The id counter keeps counting.
    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }
}
