//! The dispatcher: registration, removal, and synchronous/asynchronous fan-out.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use futures::future::{self, BoxFuture, join_all};
use topicbus_core::{BusError, Event, Outcome, Payload, Reply, SharedListener};

use crate::registry::{ListenerId, ListenerRecord, Registry};
use crate::retained::RetainedStore;
use crate::trie::{TrieNode, WILD_REST};

/// Shared mutable state of one bus instance.
///
/// Everything lives under a single mutex: the trie and registry have no
/// copy-on-read semantics, so all mutation (register, unregister, the
/// retained write on emit, once-removal during dispatch) is serialized.
/// Listener callbacks always run with the lock released so they may
/// re-enter the bus.
pub(crate) struct Inner<P, R> {
    delimiter: String,
    trie: TrieNode,
    registry: Registry<P, R>,
    retained: RetainedStore<P>,
}

impl<P, R> Inner<P, R> {
    fn split<'t>(&self, topic: &'t str) -> Vec<&'t str> {
        topic.split(self.delimiter.as_str()).collect()
    }

    /// Remove one id from registry and trie. Idempotent; the node is not
    /// pruned (dangling empty nodes are tolerated).
    pub(crate) fn unregister(&mut self, id: ListenerId) -> bool {
        let Some(record) = self.registry.remove(id) else {
            return false;
        };
        let segments: Vec<&str> = record.segments.iter().map(String::as_str).collect();
        self.trie.remove_listener(&segments, id);
        true
    }
}

/// An in-process pub/sub dispatcher over hierarchical,
/// delimiter-separated topics.
///
/// Listeners register against patterns that may contain `*` (exactly one
/// segment) or `**` (the whole remainder). Emission walks the topic trie
/// depth-first and invokes every match; the sync path fails fast on the
/// first listener error while [`emit_async`](TopicBus::emit_async)
/// settles every invocation independently.
///
/// `P` is the event payload type; `R` is what listeners return
/// (defaults to `()`).
///
/// The handle is cheap to clone; clones share one instance.
///
/// # Example
///
/// ```rust,ignore
/// let bus: TopicBus<String> = TopicBus::new();
/// let sub = bus.on("system.*", |event| {
///     println!("{}: {}", event.topic, event.payload);
///     Reply::ok(())
/// });
/// bus.emit(Event::new("system.start", "up".to_owned()), false)?;
/// sub.cancel();
/// ```
pub struct TopicBus<P, R = ()> {
    inner: Arc<Mutex<Inner<P, R>>>,
}

impl<P, R> Clone for TopicBus<P, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P, R> Default for TopicBus<P, R>
where
    P: Payload,
    R: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<P, R> TopicBus<P, R>
where
    P: Payload,
    R: Send + 'static,
{
    /// Create a bus with the default `.` delimiter.
    pub fn new() -> Self {
        Self::with_delimiter(".")
    }

    /// Create a bus with a custom delimiter, fixed for the instance's
    /// lifetime; it governs how every topic and pattern is split.
    ///
    /// # Panics
    ///
    /// Panics if the delimiter is empty.
    pub fn with_delimiter(delimiter: impl Into<String>) -> Self {
        let delimiter = delimiter.into();
        assert!(!delimiter.is_empty(), "delimiter must be non-empty");
        Self {
            inner: Arc::new(Mutex::new(Inner {
                delimiter,
                trie: TrieNode::default(),
                registry: Registry::new(),
                retained: RetainedStore::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<P, R>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a persistent listener.
    ///
    /// If an event is retained under the literal `pattern` string, the
    /// callback is invoked with it synchronously before this returns.
    pub fn on<F>(&self, pattern: &str, f: F) -> Subscription<P, R>
    where
        F: Fn(&Event<P>) -> Reply<R> + Send + Sync + 'static,
    {
        self.register(pattern, Arc::new(f), false)
    }

    /// Register a caller-held callback, keeping it removable via
    /// [`off`](TopicBus::off).
    pub fn on_shared(&self, pattern: &str, callback: &SharedListener<P, R>) -> Subscription<P, R> {
        self.register(pattern, Arc::clone(callback), false)
    }

    /// Register a fire-once listener: removed atomically with its first
    /// invocation, retained replay included.
    pub fn once<F>(&self, pattern: &str, f: F) -> Subscription<P, R>
    where
        F: Fn(&Event<P>) -> Reply<R> + Send + Sync + 'static,
    {
        self.register(pattern, Arc::new(f), true)
    }

    /// Fire-once variant of [`on_shared`](TopicBus::on_shared).
    pub fn once_shared(
        &self,
        pattern: &str,
        callback: &SharedListener<P, R>,
    ) -> Subscription<P, R> {
        self.register(pattern, Arc::clone(callback), true)
    }

    /// Receive every event regardless of topic. Sugar for registering at
    /// the root `**` pattern, which matches at depth 0.
    pub fn on_any<F>(&self, f: F) -> Subscription<P, R>
    where
        F: Fn(&Event<P>) -> Reply<R> + Send + Sync + 'static,
    {
        self.on(WILD_REST, f)
    }

    /// Shared-callback variant of [`on_any`](TopicBus::on_any).
    pub fn on_any_shared(&self, callback: &SharedListener<P, R>) -> Subscription<P, R> {
        self.on_shared(WILD_REST, callback)
    }

    fn register(
        &self,
        pattern: &str,
        callback: SharedListener<P, R>,
        once: bool,
    ) -> Subscription<P, R> {
        let (id, replay) = {
            let mut inner = self.lock();
            let segments: Vec<String> = inner
                .split(pattern)
                .into_iter()
                .map(str::to_owned)
                .collect();
            let id = inner.registry.allocate();
            {
                let path: Vec<&str> = segments.iter().map(String::as_str).collect();
                inner.trie.descend(&path).listeners.push(id);
            }
            inner.registry.insert(
                id,
                ListenerRecord {
                    callback: Arc::clone(&callback),
                    once,
                    segments,
                },
            );
            // Replay is keyed by the raw pattern string, literal equality
            // only. A once listener that replays is already spent.
            let replay = inner.retained.get(pattern).cloned();
            if replay.is_some() && once {
                inner.unregister(id);
            }
            (id, replay)
        };
        #[cfg(feature = "tracing")]
        tracing::trace!(pattern, once, id = ?id, "listener registered");
        if let Some(event) = replay {
            // Replay is best-effort state delivery: a ready error from the
            // callback is discarded, deferred work is detached.
            let _ = self.settle_sync(callback(&event));
        }
        Subscription {
            inner: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// Remove a listener by literal pattern plus callback identity.
    ///
    /// The first id at the pattern's node whose record holds the same
    /// `Arc` is removed. Returns whether anything was removed; an unknown
    /// pattern or callback is a silent no-op.
    pub fn off(&self, pattern: &str, callback: &SharedListener<P, R>) -> bool {
        let mut inner = self.lock();
        let path = inner.split(pattern);
        let found = {
            let Some(node) = inner.trie.find(&path) else {
                return false;
            };
            node.listeners.iter().copied().find(|&id| {
                inner
                    .registry
                    .get(id)
                    .is_some_and(|record| Arc::ptr_eq(&record.callback, callback))
            })
        };
        match found {
            Some(id) => {
                inner.unregister(id);
                #[cfg(feature = "tracing")]
                tracing::trace!(pattern, id = ?id, "listener removed");
                true
            }
            None => false,
        }
    }

    /// Remove every listener registered at or under `pattern`, pruning
    /// emptied nodes along that path. Components equal to `*`/`**`
    /// address those literal child keys.
    pub fn off_all(&self, pattern: &str) {
        let mut inner = self.lock();
        let path = inner.split(pattern);
        let mut removed = Vec::new();
        inner.trie.clear_subtree(&path, &mut removed);
        #[cfg(feature = "tracing")]
        tracing::trace!(pattern, removed = removed.len(), "subtree cleared");
        for id in removed {
            inner.registry.remove(id);
        }
    }

    /// Remove all listeners and all retained events. The id counter keeps
    /// counting, so ids from before the clear can never alias new ones.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.trie = TrieNode::default();
        inner.registry.clear();
        inner.retained.clear();
    }

    /// Synchronous fan-out, fail-fast.
    ///
    /// Matched listeners are invoked depth-first, exact child before `*`
    /// before `**` at each depth, registration order within a node. The
    /// first listener returning a ready error aborts the remaining
    /// invocations of this call and surfaces as
    /// [`BusError::Listener`]. With `retain`, the event overwrites the
    /// retained entry for its topic before dispatch.
    ///
    /// A [`Reply::Deferred`] is detached onto the current Tokio runtime,
    /// fire-and-forget; outside a runtime the deferred work is dropped.
    pub fn emit(&self, event: Event<P>, retain: bool) -> Result<(), BusError> {
        let matched = self.collect_matches(&event, retain);
        for id in matched {
            let Some(callback) = self.checkout(id) else {
                continue;
            };
            self.settle_sync(callback(&event))?;
        }
        Ok(())
    }

    /// Asynchronous fan-out with per-listener isolation.
    ///
    /// Same walk and retention as [`emit`](TopicBus::emit); every
    /// invocation is initiated synchronously in traversal order, then all
    /// replies are awaited collectively. One [`Outcome`] per invoked
    /// listener, in invocation-start order (completion order is not
    /// guaranteed); a rejection never aborts its siblings and never fails
    /// the call itself. Empty when nothing matches.
    pub async fn emit_async(&self, event: Event<P>, retain: bool) -> Vec<Outcome<R>> {
        let matched = self.collect_matches(&event, retain);
        let mut settling: Vec<BoxFuture<'static, Outcome<R>>> = Vec::with_capacity(matched.len());
        for id in matched {
            let Some(callback) = self.checkout(id) else {
                continue;
            };
            match callback(&event) {
                Reply::Ready(result) => {
                    settling.push(Box::pin(future::ready(Outcome::from(result))));
                }
                Reply::Deferred(fut) => {
                    settling.push(Box::pin(async move { Outcome::from(fut.await) }));
                }
            }
        }
        join_all(settling).await
    }

    /// The retained event for a literal topic, if any. Never
    /// pattern-matched.
    pub fn retained(&self, topic: &str) -> Option<Event<P>> {
        self.lock().retained.get(topic).cloned()
    }

    /// Number of currently registered listeners.
    pub fn listener_count(&self) -> usize {
        self.lock().registry.len()
    }

    /// Write the retained entry if requested, then walk the trie and
    /// return matched ids in invocation order. The dedupe set is created
    /// fresh here for every call; persisting it across calls would starve
    /// listeners after their first match.
    fn collect_matches(&self, event: &Event<P>, retain: bool) -> Vec<ListenerId> {
        let mut inner = self.lock();
        if retain {
            inner.retained.put(event.topic.clone(), event.clone());
        }
        let segments = inner.split(&event.topic);
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        inner.trie.collect(&segments, &mut seen, &mut out);
        #[cfg(feature = "tracing")]
        tracing::trace!(topic = %event.topic, matched = out.len(), "dispatching event");
        out
    }

    /// Fetch a matched listener's callback right before invocation,
    /// removing fire-once records on the way. A listener cancelled after
    /// the walk but before its turn comes up is skipped here.
    fn checkout(&self, id: ListenerId) -> Option<SharedListener<P, R>> {
        let mut inner = self.lock();
        let (callback, once) = {
            let record = inner.registry.get(id)?;
            (Arc::clone(&record.callback), record.once)
        };
        if once {
            inner.unregister(id);
        }
        Some(callback)
    }

    /// Settle a reply on the synchronous path: ready errors fail the
    /// emit, deferred work is detached.
    fn settle_sync(&self, reply: Reply<R>) -> Result<(), BusError> {
        match reply {
            Reply::Ready(Ok(_)) => Ok(()),
            Reply::Ready(Err(err)) => Err(BusError::Listener(err)),
            Reply::Deferred(fut) => {
                if let Ok(handle) = tokio::runtime::Handle::try_current() {
                    handle.spawn(async move {
                        let _ = fut.await;
                    });
                }
                Ok(())
            }
        }
    }
}

/// Handle returned by every registration call.
///
/// [`cancel`](Subscription::cancel) removes exactly the listener it was
/// issued for, idempotently. Dropping the handle does **not** cancel the
/// listener; the handle holds only a weak reference to the bus.
pub struct Subscription<P, R = ()> {
    inner: Weak<Mutex<Inner<P, R>>>,
    id: ListenerId,
}

impl<P, R> Subscription<P, R> {
    /// Remove the listener this handle was issued for. A second call, or
    /// a call after the listener is already gone, is a no-op.
    pub fn cancel(&self) {
        if let Some(inner) = self.inner.upgrade() {
            let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.unregister(self.id);
        }
    }

    /// The identifier allocated at registration time.
    pub fn id(&self) -> ListenerId {
        self.id
    }
}
