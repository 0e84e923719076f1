use std::sync::Arc;

/// Await-once correlation on top of the listener registry.
pub mod correlator;
/// Inbound event model.
pub mod event;
/// Listener trait and handles.
pub mod listener;
/// Outbound message content.
pub mod message;
/// Listener registry and per-listener delivery.
pub mod registry;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
/// Outbound transport seam.
pub mod transport;

pub use correlator::{AwaitError, Correlator};
pub use event::{ButtonClick, CommandInvocation, Event, EventKind, EventPayload, Ready};
pub use listener::{Listener, ListenerControl, ListenerId};
pub use message::{Control, ControlStyle, EmbedPage, Page};
pub use registry::ListenerRegistry;
pub use transport::{InteractionHandle, MessageHandle, ReplyTarget, Transport, TransportError};

/// Shared application context passed into command handlers.
///
/// Cheap to clone because it only stores reference-counted shared state.
#[derive(Clone)]
pub struct Context {
    pub transport: Arc<dyn Transport>,
    pub registry: ListenerRegistry,
    /// `(shard id, shard total)` this process runs as.
    pub shard: (u32, u32),
}

impl Context {
    /// Create a new application context.
    pub fn new(transport: Arc<dyn Transport>, registry: ListenerRegistry, shard: (u32, u32)) -> Self {
        Self {
            transport,
            registry,
            shard,
        }
    }

    /// Correlator bound to this context's registry.
    pub fn correlator(&self) -> Correlator {
        Correlator::new(self.registry.clone())
    }
}
