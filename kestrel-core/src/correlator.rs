//! Await-once correlation: suspend until the next event matching a predicate.
//!
//! Each call registers a transient listener that resolves a one-shot channel
//! with the first matching payload and detaches itself. A guard owned by the
//! awaiting future removes the listener on every other exit path (timeout,
//! cancellation, future dropped), so registry size always returns to its
//! baseline once the call resolves.

use std::marker::PhantomData;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::event::{Event, EventPayload};
use crate::listener::{Listener, ListenerControl, ListenerId};
use crate::registry::ListenerRegistry;

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum AwaitError {
    #[error("await was cancelled before a matching event arrived")]
    Cancelled,
    #[error("no matching event arrived before the deadline")]
    TimedOut,
    #[error("listener was removed before a matching event arrived")]
    Closed,
}

/// Converts "the next event of type `T` matching `P`" into a single result.
#[derive(Clone)]
pub struct Correlator {
    registry: ListenerRegistry,
}

impl Correlator {
    pub fn new(registry: ListenerRegistry) -> Self {
        Self { registry }
    }

    /// Wait for the next `T` payload, whatever it contains.
    pub fn next_any<T: EventPayload>(
        &self,
        timeout: Option<Duration>,
    ) -> impl Future<Output = Result<T, AwaitError>> + Send + use<T> {
        self.next(|_: &T| true, timeout)
    }

    /// Wait for the next `T` payload for which `predicate` holds.
    pub fn next<T, P>(
        &self,
        predicate: P,
        timeout: Option<Duration>,
    ) -> impl Future<Output = Result<T, AwaitError>> + Send + use<T, P>
    where
        T: EventPayload,
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.next_or_cancel(predicate, timeout, &CancellationToken::new())
    }

    /// Like [`next`](Self::next), additionally failing with
    /// [`AwaitError::Cancelled`] once `cancel` fires.
    ///
    /// The listener is registered by this call, not on first poll: events
    /// dispatched between the call and the first `.await` are observed.
    /// Firing `cancel` retires the listener immediately.
    pub fn next_or_cancel<T, P>(
        &self,
        predicate: P,
        timeout: Option<Duration>,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<T, AwaitError>> + Send + use<T, P>
    where
        T: EventPayload,
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let (resolve, resolved) = oneshot::channel();
        let id = self.registry.add_with_cancel(
            Arc::new(AwaitOnce {
                predicate,
                resolve: Mutex::new(Some(resolve)),
                _payload: PhantomData,
            }),
            cancel,
        );
        let guard = RemoveOnDrop {
            registry: self.registry.clone(),
            id,
        };
        let cancel = cancel.clone();

        async move {
            let _guard = guard;
            let deadline = async {
                match timeout {
                    Some(timeout) => tokio::time::sleep(timeout).await,
                    None => std::future::pending().await,
                }
            };

            tokio::select! {
                biased;
                () = cancel.cancelled() => Err(AwaitError::Cancelled),
                payload = resolved => payload.map_err(|_| AwaitError::Closed),
                () = deadline => Err(AwaitError::TimedOut),
            }
        }
    }
}

struct AwaitOnce<T, P> {
    predicate: P,
    resolve: Mutex<Option<oneshot::Sender<T>>>,
    _payload: PhantomData<fn() -> T>,
}

#[async_trait]
impl<T, P> Listener for AwaitOnce<T, P>
where
    T: EventPayload,
    P: Fn(&T) -> bool + Send + Sync + 'static,
{
    fn accepts(&self, event: &Event) -> bool {
        T::from_event(event).is_some_and(|payload| (self.predicate)(payload))
    }

    async fn on_event(&self, event: &Event) -> ListenerControl {
        let resolve = self
            .resolve
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let (Some(resolve), Some(payload)) = (resolve, T::from_event(event)) {
            // The caller may be gone already; nothing to resolve then.
            let _ = resolve.send(payload.clone());
        }

        ListenerControl::Detach
    }
}

struct RemoveOnDrop {
    registry: ListenerRegistry,
    id: ListenerId,
}

impl Drop for RemoveOnDrop {
    fn drop(&mut self) {
        self.registry.remove(self.id);
    }
}
