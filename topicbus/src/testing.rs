//! Testing utilities for topicbus.
//!
//! Small listener factories for verifying dispatch behavior:
//!
//! - [`RecordingListener`]: records every event it receives
//! - [`CountingListener`]: counts invocations
//! - [`failing`]: a listener that always returns a ready error

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use topicbus_core::{Event, Payload, Reply, SharedListener, listener};

/// Records every event delivered to it.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingListener::new();
/// bus.on_shared("job.*", &recorder.listener());
/// bus.emit(Event::new("job.done", 1), false)?;
/// assert_eq!(recorder.topics(), ["job.done"]);
/// ```
pub struct RecordingListener<P> {
    events: Arc<Mutex<Vec<Event<P>>>>,
}

impl<P: Payload> RecordingListener<P> {
    /// Create a new recorder.
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Build the listener callback backed by this recorder.
    pub fn listener<R>(&self) -> SharedListener<P, R>
    where
        R: Default + Send + 'static,
    {
        let events = Arc::clone(&self.events);
        listener(move |event: &Event<P>| {
            events.lock().unwrap().push(event.clone());
            Reply::ok(R::default())
        })
    }

    /// A clone of the recorded events.
    pub fn events(&self) -> Vec<Event<P>> {
        self.events.lock().unwrap().clone()
    }

    /// The topics of the recorded events, in delivery order.
    pub fn topics(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|event| event.topic.clone())
            .collect()
    }

    /// Number of recorded events.
    pub fn count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Drop everything recorded so far.
    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl<P: Payload> Default for RecordingListener<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Clone for RecordingListener<P> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
        }
    }
}

/// Counts how many times it is invoked.
pub struct CountingListener {
    count: Arc<AtomicUsize>,
}

impl CountingListener {
    /// Create a new counter.
    pub fn new() -> Self {
        Self {
            count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Build the listener callback backed by this counter.
    pub fn listener<P, R>(&self) -> SharedListener<P, R>
    where
        P: Payload,
        R: Default + Send + 'static,
    {
        let count = Arc::clone(&self.count);
        listener(move |_event: &Event<P>| {
            count.fetch_add(1, Ordering::SeqCst);
            Reply::ok(R::default())
        })
    }

    /// The current invocation count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl Default for CountingListener {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for CountingListener {
    fn clone(&self) -> Self {
        Self {
            count: Arc::clone(&self.count),
        }
    }
}

/// A listener that always fails synchronously with the given message.
pub fn failing<P, R>(message: &'static str) -> SharedListener<P, R>
where
    P: Payload,
    R: Send + 'static,
{
    listener(move |_event: &Event<P>| Reply::err(message))
}
