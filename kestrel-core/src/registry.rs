//! Process-wide set of active listeners.
//!
//! Every listener owns a queue and a worker task. `dispatch` pushes the shared
//! event into each accepting listener's queue in arrival order; the worker
//! delivers them one at a time, so a listener never sees two events
//! concurrently while unrelated listeners keep running.

use std::sync::{
    Arc, Weak,
    atomic::{AtomicU64, Ordering},
};

use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::event::Event;
use crate::listener::{Listener, ListenerControl, ListenerId};

struct Entry {
    listener: Arc<dyn Listener>,
    queue: mpsc::UnboundedSender<Arc<Event>>,
    cancel: CancellationToken,
}

impl Entry {
    fn is_live(&self) -> bool {
        !self.cancel.is_cancelled()
    }
}

#[derive(Default)]
struct Inner {
    listeners: DashMap<ListenerId, Entry>,
    next_id: AtomicU64,
}

impl Inner {
    fn remove(&self, id: ListenerId) -> bool {
        let Some((_, entry)) = self.listeners.remove(&id) else {
            return false;
        };

        entry.cancel.cancel();
        debug!(listener = %id, "listener removed");
        true
    }
}

/// Shared listener registry.
///
/// Cheap to clone; all clones refer to the same set of listeners.
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    inner: Arc<Inner>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener and start its delivery worker.
    ///
    /// Must be called from within a tokio runtime.
    pub fn add(&self, listener: Arc<dyn Listener>) -> ListenerId {
        self.add_with_cancel(listener, &CancellationToken::new())
    }

    /// Register a listener that is retired as soon as `cancel` fires.
    ///
    /// A retired listener is no longer counted or dispatched to, even before
    /// its worker gets to remove the entry.
    pub fn add_with_cancel(
        &self,
        listener: Arc<dyn Listener>,
        cancel: &CancellationToken,
    ) -> ListenerId {
        let id = ListenerId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let (queue, events) = mpsc::unbounded_channel();
        let cancel = cancel.child_token();

        self.inner.listeners.insert(
            id,
            Entry {
                listener: Arc::clone(&listener),
                queue,
                cancel: cancel.clone(),
            },
        );

        tokio::spawn(deliver(
            Arc::downgrade(&self.inner),
            id,
            listener,
            events,
            cancel,
        ));

        debug!(listener = %id, "listener added");
        id
    }

    /// Remove a listener.
    ///
    /// Returns `true` only for the call that actually removed it; repeated or
    /// racing removals of the same id are no-ops.
    pub fn remove(&self, id: ListenerId) -> bool {
        self.inner.remove(id)
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.inner
            .listeners
            .get(&id)
            .is_some_and(|entry| entry.is_live())
    }

    /// Number of registered, non-retired listeners.
    pub fn len(&self) -> usize {
        self.inner
            .listeners
            .iter()
            .filter(|entry| entry.is_live())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Queue `event` for every listener that accepts it.
    ///
    /// Returns how many listeners it was queued for. Listeners registered
    /// after this call never observe it.
    pub fn dispatch(&self, event: Event) -> usize {
        let event = Arc::new(event);
        let mut queued = 0;

        for entry in self.inner.listeners.iter() {
            if !entry.is_live() || !entry.listener.accepts(&event) {
                continue;
            }

            if entry.queue.send(Arc::clone(&event)).is_ok() {
                queued += 1;
            }
        }

        trace!(kind = ?event.kind(), queued, "event dispatched");
        queued
    }

    /// Remove every listener.
    pub fn clear(&self) {
        let ids: Vec<ListenerId> = self.inner.listeners.iter().map(|entry| *entry.key()).collect();
        for id in ids {
            self.inner.remove(id);
        }
    }
}

async fn deliver(
    registry: Weak<Inner>,
    id: ListenerId,
    listener: Arc<dyn Listener>,
    mut events: mpsc::UnboundedReceiver<Arc<Event>>,
    cancel: CancellationToken,
) {
    loop {
        let event = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                if let Some(registry) = registry.upgrade() {
                    registry.remove(id);
                }
                break;
            }
            event = events.recv() => match event {
                Some(event) => event,
                None => break,
            },
        };

        if listener.on_event(&event).await == ListenerControl::Detach {
            if let Some(registry) = registry.upgrade() {
                registry.remove(id);
            }
            break;
        }
    }

    trace!(listener = %id, "listener worker stopped");
}
