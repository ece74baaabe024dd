//! Listener reply and settled-outcome types.

use std::future::Future;

use futures::future::BoxFuture;

use crate::error::BoxError;

/// What a listener callback returns from one invocation.
///
/// A callback may finish on the spot or hand back a future. The
/// synchronous emit path fails fast on a ready error and detaches
/// deferred work; the asynchronous path awaits everything and settles
/// each invocation into an [`Outcome`].
pub enum Reply<R> {
    /// The listener completed synchronously.
    Ready(Result<R, BoxError>),
    /// The listener started asynchronous work that settles later.
    Deferred(BoxFuture<'static, Result<R, BoxError>>),
}

impl<R> Reply<R> {
    /// A synchronous success.
    pub fn ok(value: R) -> Self {
        Reply::Ready(Ok(value))
    }

    /// A synchronous failure.
    pub fn err(error: impl Into<BoxError>) -> Self {
        Reply::Ready(Err(error.into()))
    }

    /// Defer completion to the given future.
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = Result<R, BoxError>> + Send + 'static,
    {
        Reply::Deferred(Box::pin(future))
    }
}

/// The settled result of one listener invocation on the async path.
///
/// One entry per invoked listener, in invocation-start order; a rejected
/// entry never aborts its siblings.
#[derive(Debug)]
pub enum Outcome<R> {
    /// The listener completed with a value.
    Fulfilled(R),
    /// The listener failed with a reason.
    Rejected(BoxError),
}

impl<R> Outcome<R> {
    /// Whether this outcome settled successfully.
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, Outcome::Fulfilled(_))
    }

    /// Whether this outcome settled with a failure.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Outcome::Rejected(_))
    }

    /// The success value, if fulfilled.
    pub fn value(&self) -> Option<&R> {
        match self {
            Outcome::Fulfilled(value) => Some(value),
            Outcome::Rejected(_) => None,
        }
    }

    /// The failure reason, if rejected.
    pub fn reason(&self) -> Option<&BoxError> {
        match self {
            Outcome::Fulfilled(_) => None,
            Outcome::Rejected(reason) => Some(reason),
        }
    }

    /// Convert into a plain `Result`.
    pub fn into_result(self) -> Result<R, BoxError> {
        match self {
            Outcome::Fulfilled(value) => Ok(value),
            Outcome::Rejected(reason) => Err(reason),
        }
    }
}

impl<R> From<Result<R, BoxError>> for Outcome<R> {
    fn from(result: Result<R, BoxError>) -> Self {
        match result {
            Ok(value) => Outcome::Fulfilled(value),
            Err(reason) => Outcome::Rejected(reason),
        }
    }
}
