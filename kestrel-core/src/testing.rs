//! Recording transport for tests.

use std::collections::VecDeque;
use std::sync::{
    Mutex, PoisonError,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use async_trait::async_trait;

use crate::message::{Control, Page};
use crate::transport::{
    HistoryEntry, InteractionHandle, MessageHandle, ReplyTarget, Transport, TransportError,
};

/// One outbound call captured by [`MockTransport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Recorded {
    Sent {
        target: ReplyTarget,
        page: Page,
        controls: Vec<Control>,
    },
    Edited {
        message: MessageHandle,
        page: Page,
        controls: Vec<Control>,
    },
    ControlsCleared(MessageHandle),
    Ephemeral {
        interaction: InteractionHandle,
        content: String,
    },
    Deleted {
        channel_id: u64,
        message_id: u64,
    },
}

type SendHook = Box<dyn Fn(&ReplyTarget, &[Control]) + Send + Sync>;

/// In-memory [`Transport`] that records every call.
#[derive(Default)]
pub struct MockTransport {
    calls: Mutex<Vec<Recorded>>,
    on_send: Mutex<Option<SendHook>>,
    history: Mutex<VecDeque<Vec<HistoryEntry>>>,
    next_message_id: AtomicU64,
    fail_sends: AtomicBool,
    fail_edits: AtomicBool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `send_message` fail.
    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    /// Make every following `edit_message` fail.
    pub fn fail_edits(&self, fail: bool) {
        self.fail_edits.store(fail, Ordering::SeqCst);
    }

    /// Run `hook` inside every following successful `send_message`, before it
    /// returns.
    pub fn on_send(&self, hook: impl Fn(&ReplyTarget, &[Control]) + Send + Sync + 'static) {
        *self.on_send.lock().unwrap_or_else(PoisonError::into_inner) = Some(Box::new(hook));
    }

    /// Queue one page of channel history returned by the next lookup.
    pub fn push_history(&self, page: Vec<HistoryEntry>) {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(page);
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Pages rendered through `edit_message`, oldest first.
    pub fn edited_pages(&self) -> Vec<Page> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Recorded::Edited { page, .. } => Some(page),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Recorded) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send_message(
        &self,
        target: &ReplyTarget,
        page: &Page,
        controls: &[Control],
    ) -> Result<MessageHandle, TransportError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(TransportError::Http("send rejected".to_owned()));
        }

        self.record(Recorded::Sent {
            target: target.clone(),
            page: page.clone(),
            controls: controls.to_vec(),
        });

        if let Some(hook) = self
            .on_send
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            hook(target, controls);
        }

        let handle = match target {
            ReplyTarget::Channel(channel_id) => MessageHandle::Channel {
                channel_id: *channel_id,
                message_id: self.next_message_id.fetch_add(1, Ordering::SeqCst) + 1,
            },
            ReplyTarget::Interaction { handle, .. } => MessageHandle::original_response(handle),
        };

        Ok(handle)
    }

    async fn edit_message(
        &self,
        message: &MessageHandle,
        page: &Page,
        controls: &[Control],
    ) -> Result<(), TransportError> {
        if self.fail_edits.load(Ordering::SeqCst) {
            return Err(TransportError::Http("edit rejected".to_owned()));
        }

        self.record(Recorded::Edited {
            message: message.clone(),
            page: page.clone(),
            controls: controls.to_vec(),
        });
        Ok(())
    }

    async fn clear_controls(&self, message: &MessageHandle) -> Result<(), TransportError> {
        self.record(Recorded::ControlsCleared(message.clone()));
        Ok(())
    }

    async fn respond_ephemeral(
        &self,
        interaction: &InteractionHandle,
        content: &str,
    ) -> Result<(), TransportError> {
        self.record(Recorded::Ephemeral {
            interaction: interaction.clone(),
            content: content.to_owned(),
        });
        Ok(())
    }

    async fn channel_history(
        &self,
        _channel_id: u64,
        _before: Option<u64>,
        _limit: u16,
    ) -> Result<Vec<HistoryEntry>, TransportError> {
        Ok(self
            .history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_default())
    }

    async fn delete_message(
        &self,
        channel_id: u64,
        message_id: u64,
    ) -> Result<(), TransportError> {
        self.record(Recorded::Deleted {
            channel_id,
            message_id,
        });
        Ok(())
    }
}
