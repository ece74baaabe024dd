//! Error types for topicbus.
//!
//! Listener callbacks report failures as [`BoxError`]; the bus itself
//! surfaces them through [`BusError`].

use std::time::Duration;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by bus operations.
#[derive(Error, Debug)]
pub enum BusError {
    /// A listener failed during synchronous dispatch.
    ///
    /// Carries the first failing listener's error; remaining listeners
    /// for that emission were not invoked.
    #[error("listener error")]
    Listener(#[source] BoxError),

    /// A wait elapsed before any matching event arrived.
    #[error("timed out after {timeout:?} waiting for `{pattern}`")]
    Timeout {
        /// The pattern the wait was registered against.
        pattern: String,
        /// The bound that elapsed.
        timeout: Duration,
    },
}

impl From<BoxError> for BusError {
    fn from(err: BoxError) -> Self {
        BusError::Listener(err)
    }
}
