//! Listener callback aliases.

use std::sync::Arc;

use crate::event::Event;
use crate::reply::Reply;

/// The callback shape every listener takes: a thread-safe function from
/// a borrowed event to a [`Reply`].
pub type ListenerFn<P, R> = dyn Fn(&Event<P>) -> Reply<R> + Send + Sync;

/// A reference-counted listener callback.
///
/// This is the identity-comparable form: removal by callback
/// (`off`) matches via `Arc::ptr_eq`, so only the exact value the
/// caller registered with can be used to remove it. Two independently
/// created closures with identical behavior are not interchangeable.
pub type SharedListener<P, R> = Arc<ListenerFn<P, R>>;

/// Wrap a closure into a [`SharedListener`], keeping a handle the caller
/// can later pass to `off`.
pub fn listener<P, R, F>(f: F) -> SharedListener<P, R>
where
    F: Fn(&Event<P>) -> Reply<R> + Send + Sync + 'static,
{
    Arc::new(f)
}
