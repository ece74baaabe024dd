//! Event type and payload bound.

/// A single emitted event: a topic string plus an opaque payload.
///
/// Events are immutable once emitted. The topic is one or more
/// delimiter-joined segments; the empty string is itself a valid
/// single-segment topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event<P> {
    /// The delimiter-separated topic this event was emitted under.
    pub topic: String,
    /// The caller-supplied payload.
    pub payload: P,
}

impl<P> Event<P> {
    /// Create a new event.
    pub fn new(topic: impl Into<String>, payload: P) -> Self {
        Self {
            topic: topic.into(),
            payload,
        }
    }
}

/// Bound every event payload must meet.
///
/// Payloads are cloned for retained-state replay and handed to listeners
/// across await points, so they must be cloneable and thread-safe.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid payload",
    label = "must be `Clone + Send + Sync + 'static`"
)]
pub trait Payload: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Payload for T {}
