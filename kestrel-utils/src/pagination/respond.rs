//! Sending paginators and tearing them down once they expire.

use std::sync::Arc;

use kestrel_core::{
    Context, ListenerId, ListenerRegistry, MessageHandle, ReplyTarget, Transport,
};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::paginator::{Paginator, PaginatorError, PaginatorListener};

/// Generic message shown when a pagination interaction belongs to another user.
pub const PAGINATION_WRONG_USER_MESSAGE: &str = "This pagination session belongs to another user.";

/// Owner-side handle of a sent paginator.
pub struct PaginatorHandle {
    paginator: Arc<Paginator>,
    registry: ListenerRegistry,
    listener: Option<ListenerId>,
    message: MessageHandle,
    stop: CancellationToken,
}

impl PaginatorHandle {
    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn cursor(&self) -> usize {
        self.paginator.cursor()
    }

    pub fn is_expired(&self) -> bool {
        self.paginator.is_expired()
    }

    /// Listener id while the paginator is navigable. `None` for single-page
    /// paginators, which are never registered.
    pub fn listener_id(&self) -> Option<ListenerId> {
        self.listener
    }

    /// The sent message.
    pub fn message(&self) -> &MessageHandle {
        &self.message
    }

    /// Expire the paginator, remove its listener and have the expiry task
    /// strip the controls right away.
    ///
    /// Returns `true` when this call removed the listener.
    pub fn detach(&self) -> bool {
        self.paginator.expire();
        self.stop.cancel();
        self.listener
            .is_some_and(|listener| self.registry.remove(listener))
    }
}

/// Register `paginator`, send its first page with navigation controls, and
/// arm its expiry timer.
///
/// The listener is registered before the send so no early click is missed.
/// If the send fails the listener is removed again and the error returned.
pub async fn send_paginator(
    ctx: &Context,
    target: ReplyTarget,
    paginator: Paginator,
) -> Result<PaginatorHandle, PaginatorError> {
    let paginator = Arc::new(paginator);

    if paginator.pages().len() <= 1 {
        let message = ctx
            .transport
            .send_message(&target, paginator.current_page(), &[])
            .await?;
        paginator.expire();

        return Ok(PaginatorHandle {
            paginator,
            registry: ctx.registry.clone(),
            listener: None,
            message,
            stop: CancellationToken::new(),
        });
    }

    let listener = ctx.registry.add(Arc::new(PaginatorListener::new(
        Arc::clone(&paginator),
        Arc::clone(&ctx.transport),
    )));

    let message = match ctx
        .transport
        .send_message(&target, paginator.current_page(), &paginator.controls())
        .await
    {
        Ok(message) => message,
        Err(source) => {
            paginator.expire();
            ctx.registry.remove(listener);
            return Err(source.into());
        }
    };

    let stop = CancellationToken::new();
    schedule_expiry(
        Arc::clone(&ctx.transport),
        ctx.registry.clone(),
        Arc::clone(&paginator),
        listener,
        message.clone(),
        stop.clone(),
    );

    Ok(PaginatorHandle {
        paginator,
        registry: ctx.registry.clone(),
        listener: Some(listener),
        message,
        stop,
    })
}

/// Sleep until the paginator's (possibly re-armed) deadline, then detach its
/// listener and strip the controls from `message`.
///
/// Firing `stop` ends the wait early and tears down the same way.
pub fn schedule_expiry(
    transport: Arc<dyn Transport>,
    registry: ListenerRegistry,
    paginator: Arc<Paginator>,
    listener: ListenerId,
    message: MessageHandle,
    stop: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(deadline) = paginator.active_deadline() {
            tokio::select! {
                () = stop.cancelled() => {
                    paginator.expire();
                    break;
                }
                () = tokio::time::sleep_until(deadline) => {
                    if paginator.expire_if_due() {
                        break;
                    }
                }
            }
        }

        registry.remove(listener);

        if let Err(source) = transport.clear_controls(&message).await {
            debug!(?source, nonce = %paginator.nonce(), "failed to strip pagination controls");
        }
    })
}
