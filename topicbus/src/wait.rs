//! Wait bridge: turn a single matching event into a single resolved value.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::oneshot;
use topicbus_core::{BusError, Event, Payload, Reply};

use crate::bus::TopicBus;

impl<P, R> TopicBus<P, R>
where
    P: Payload,
    R: Default + Send + 'static,
{
    /// Suspend until an event matching `pattern` arrives, or until
    /// `timeout` elapses.
    ///
    /// Internally registers a fire-once listener bridged through a
    /// oneshot channel. With `Some(bound)`, whichever trigger fires first
    /// disables the other: a matching event drops the timer, an elapsed
    /// timer cancels the subscription (so it cannot fire later) and fails
    /// with [`BusError::Timeout`] carrying the pattern and the bound.
    /// With `None` the wait suspends indefinitely.
    pub async fn wait_for(
        &self,
        pattern: &str,
        timeout: Option<Duration>,
    ) -> Result<Event<P>, BusError> {
        let (tx, rx) = oneshot::channel::<Event<P>>();
        let slot = Mutex::new(Some(tx));
        let subscription = self.once(pattern, move |event: &Event<P>| {
            if let Some(tx) = slot
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take()
            {
                let _ = tx.send(event.clone());
            }
            Reply::ok(R::default())
        });

        let matched = async move {
            match rx.await {
                Ok(event) => event,
                // The subscription was torn down externally (`clear` or
                // `off_all`); the wait stays pending until the bound, if
                // any, elapses.
                Err(_) => futures::future::pending().await,
            }
        };

        match timeout {
            Some(bound) => match tokio::time::timeout(bound, matched).await {
                Ok(event) => Ok(event),
                Err(_) => {
                    subscription.cancel();
                    #[cfg(feature = "tracing")]
                    tracing::debug!(pattern, ?bound, "wait timed out");
                    Err(BusError::Timeout {
                        pattern: pattern.to_owned(),
                        timeout: bound,
                    })
                }
            },
            None => Ok(matched.await),
        }
    }
}
