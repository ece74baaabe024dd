//! Topic trie: pattern storage and wildcard matching.

use std::collections::{HashMap, HashSet};

use crate::registry::ListenerId;

/// Child key that matches exactly one concrete segment.
pub(crate) const WILD_ONE: &str = "*";
/// Child key that matches the whole remainder of a topic.
pub(crate) const WILD_REST: &str = "**";

/// One node of the topic trie.
///
/// The root represents the empty prefix. A node may hold listeners and
/// children at the same time (a pattern can be both a leaf and a prefix
/// of other patterns). `*` and `**` are ordinary child keys; nothing
/// stops a literal topic segment from spelling them, and the trie does
/// not tell the two apart.
#[derive(Default)]
pub(crate) struct TrieNode {
    /// Listener ids registered exactly at this path, in registration order.
    pub(crate) listeners: Vec<ListenerId>,
    pub(crate) children: HashMap<String, TrieNode>,
}

impl TrieNode {
    /// Walk down from this node, creating children as needed, and return
    /// the node for the full segment path.
    pub(crate) fn descend(&mut self, segments: &[&str]) -> &mut TrieNode {
        let mut node = self;
        for segment in segments {
            node = node.children.entry((*segment).to_owned()).or_default();
        }
        node
    }

    /// Lookup without creation; `None` as soon as a segment is absent.
    pub(crate) fn find(&self, segments: &[&str]) -> Option<&TrieNode> {
        let mut node = self;
        for segment in segments {
            node = node.children.get(*segment)?;
        }
        Some(node)
    }

    /// Collect every listener matching the given concrete segments.
    ///
    /// Ids at a node match once the segment list is exhausted. While
    /// segments remain, the exact child is walked before `*`. The `**`
    /// child is always walked with an empty remainder, so it collapses
    /// everything below the current depth; children hanging off a `**`
    /// node are never reached. `seen` is the per-emission dedupe set,
    /// created fresh by the caller for every dispatch.
    pub(crate) fn collect(
        &self,
        segments: &[&str],
        seen: &mut HashSet<ListenerId>,
        out: &mut Vec<ListenerId>,
    ) {
        if segments.is_empty() {
            for &id in &self.listeners {
                if seen.insert(id) {
                    out.push(id);
                }
            }
        } else {
            if let Some(child) = self.children.get(segments[0]) {
                child.collect(&segments[1..], seen, out);
            }
            if let Some(child) = self.children.get(WILD_ONE) {
                child.collect(&segments[1..], seen, out);
            }
        }
        if let Some(child) = self.children.get(WILD_REST) {
            child.collect(&[], seen, out);
        }
    }

    /// Remove one id from the node at the given path. The node is left in
    /// place even when emptied; only `clear_subtree` prunes.
    pub(crate) fn remove_listener(&mut self, segments: &[&str], id: ListenerId) -> bool {
        let mut node = self;
        for segment in segments {
            match node.children.get_mut(*segment) {
                Some(child) => node = child,
                None => return false,
            }
        }
        let before = node.listeners.len();
        node.listeners.retain(|&other| other != id);
        node.listeners.len() != before
    }

    /// Clear every listener under the node at the given path, reporting
    /// the removed ids, and prune nodes left empty along that path as the
    /// walk unwinds.
    pub(crate) fn clear_subtree(&mut self, segments: &[&str], removed: &mut Vec<ListenerId>) {
        if segments.is_empty() {
            self.drain_all(removed);
            return;
        }
        let Some(child) = self.children.get_mut(segments[0]) else {
            return;
        };
        child.clear_subtree(&segments[1..], removed);
        if child.listeners.is_empty() && child.children.is_empty() {
            self.children.remove(segments[0]);
        }
    }

    fn drain_all(&mut self, removed: &mut Vec<ListenerId>) {
        removed.append(&mut self.listeners);
        for (_, mut child) in self.children.drain() {
            child.drain_all(removed);
        }
    }
}
