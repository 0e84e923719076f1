use std::fmt;

use async_trait::async_trait;

use crate::event::Event;

/// Opaque handle of a registered listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a listener wants after handling an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListenerControl {
    /// Stay registered.
    Continue,
    /// Remove this listener from the registry.
    Detach,
}

/// A predicate + callback pair registered in a
/// [`ListenerRegistry`](crate::registry::ListenerRegistry).
///
/// Deliveries to one listener are serialized: `on_event` is never entered
/// again before the previous call returned. Different listeners run
/// concurrently.
#[async_trait]
pub trait Listener: Send + Sync + 'static {
    /// Whether `event` should be queued for this listener at all.
    ///
    /// Runs synchronously inside `dispatch`; must not touch the registry.
    fn accepts(&self, _event: &Event) -> bool {
        true
    }

    /// Handle one delivered event.
    async fn on_event(&self, event: &Event) -> ListenerControl;
}
