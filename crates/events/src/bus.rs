//! Event publishing/subscription abstraction (mechanics only).
//!
//! Session events are control signals ("navigate to the public entry now"),
//! so the bus is deliberately small:
//!
//! - **Synchronous publish**: the 401 handler publishes before the failing call
//!   returns, so the redirect is queued before any caller sees the error.
//! - **Broadcast**: every subscriber gets a copy of every event.
//! - **Idempotent consumers**: two concurrent 401s produce two `Terminated`
//!   events; navigating to the public entry twice is harmless.
//! - **No persistence**: a subscriber that is not listening misses the event.

use std::sync::Arc;
use std::sync::mpsc::Receiver;

/// A subscription to an event stream.
///
/// ## Usage Pattern
///
/// ```ignore
/// let subscription = bus.subscribe();
///
/// while let Ok(event) = subscription.try_recv() {
///     if let Some(path) = event.redirect_to() {
///         router.navigate(path);
///     }
/// }
/// ```
///
/// Subscriptions are meant for a single consumer.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Drain everything currently queued without blocking.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}

/// Transport-agnostic pub/sub contract.
///
/// `publish()` can fail; publishers treat failure as "nobody will navigate for
/// us" and log it, they never turn it into a user-facing error.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
