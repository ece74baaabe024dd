//! # topicbus-core
//!
//! Core types for the topicbus event dispatcher.
//!
//! This crate has minimal dependencies and holds the shared vocabulary:
//!
//! - [`Event`] and the [`Payload`] bound
//! - [`Reply`] (what a listener returns) and [`Outcome`] (how an async
//!   invocation settles)
//! - [`ListenerFn`] / [`SharedListener`] callback aliases
//! - [`BusError`] and the [`BoxError`] alias
//!
//! The matching and dispatch engine lives in the `topicbus` crate.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod error;
mod event;
mod listener;
mod reply;

pub use error::{BoxError, BusError};
pub use event::{Event, Payload};
pub use listener::{ListenerFn, SharedListener, listener};
pub use reply::{Outcome, Reply};
