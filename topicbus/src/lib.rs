//! # topicbus
//!
//! An in-process publish/subscribe dispatcher that routes typed events to
//! listeners registered against hierarchical, delimiter-separated topic
//! patterns.
//!
//! - `*` matches exactly one segment, `**` matches the whole remainder
//!   of a topic.
//! - [`TopicBus::emit`] fans out synchronously and fails fast on the
//!   first listener error; [`TopicBus::emit_async`] settles every
//!   invocation independently, allSettled-style.
//! - Events emitted with `retain` are replayed to later subscribers of
//!   the exact same topic.
//! - [`TopicBus::wait_for`] suspends until one matching event arrives,
//!   optionally bounded by a timeout.
//!
//! ```rust,ignore
//! use topicbus::{Event, Reply, TopicBus};
//!
//! #[tokio::main]
//! async fn main() {
//!     let bus: TopicBus<String> = TopicBus::new();
//!     bus.on("job.**", |event| {
//!         println!("{}: {}", event.topic, event.payload);
//!         Reply::ok(())
//!     });
//!     bus.emit(Event::new("job.build.done", "ok".into()), false).unwrap();
//! }
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod bus;
mod registry;
mod retained;
mod trie;
mod wait;

pub mod testing;

// Re-export the core vocabulary
pub use topicbus_core::{
    BoxError, BusError, Event, ListenerFn, Outcome, Payload, Reply, SharedListener, listener,
};

pub use bus::{Subscription, TopicBus};
pub use registry::ListenerId;
