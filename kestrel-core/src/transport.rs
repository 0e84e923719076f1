//! Outbound calls to the chat service, expressed as a trait so the
//! correlation and pagination machinery never depends on a concrete client.

use async_trait::async_trait;
use thiserror::Error;

use crate::message::{Control, Page};

/// Identifies an interaction that can still be responded to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InteractionHandle {
    pub application_id: u64,
    pub interaction_id: u64,
    pub token: String,
}

impl InteractionHandle {
    pub fn new(application_id: u64, interaction_id: u64, token: impl Into<String>) -> Self {
        Self {
            application_id,
            interaction_id,
            token: token.into(),
        }
    }
}

/// Where a new message is sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReplyTarget {
    /// Post a regular message into a channel.
    Channel(u64),
    /// Answer an interaction that has not been responded to yet.
    Interaction {
        handle: InteractionHandle,
        ephemeral: bool,
    },
}

/// An already sent message that can be edited later.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MessageHandle {
    /// A regular channel message.
    Channel { channel_id: u64, message_id: u64 },
    /// The original response of an interaction.
    InteractionResponse { application_id: u64, token: String },
    /// The message a component interaction originated from, edited by
    /// answering that interaction.
    Component(InteractionHandle),
}

impl MessageHandle {
    /// Handle to the original response of `interaction`.
    pub fn original_response(interaction: &InteractionHandle) -> Self {
        Self::InteractionResponse {
            application_id: interaction.application_id,
            token: interaction.token.clone(),
        }
    }
}

/// One message returned by a channel history lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub message_id: u64,
    /// Whether the bot itself authored the message.
    pub from_self: bool,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("http request failed: {0}")]
    Http(String),
    #[error("failed to deserialize response: {0}")]
    Deserialize(String),
    #[error("outbound payload rejected: {0}")]
    Validation(String),
    #[error("missing {0} for this call")]
    MissingContext(&'static str),
}

/// Outbound side of the chat service.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Send a new message and return a handle to edit it later.
    async fn send_message(
        &self,
        target: &ReplyTarget,
        page: &Page,
        controls: &[Control],
    ) -> Result<MessageHandle, TransportError>;

    /// Replace content and controls of an existing message.
    async fn edit_message(
        &self,
        message: &MessageHandle,
        page: &Page,
        controls: &[Control],
    ) -> Result<(), TransportError>;

    /// Remove every control from a message, keeping its content.
    async fn clear_controls(&self, message: &MessageHandle) -> Result<(), TransportError>;

    /// Answer an interaction with a message only the actor can see.
    async fn respond_ephemeral(
        &self,
        interaction: &InteractionHandle,
        content: &str,
    ) -> Result<(), TransportError>;

    /// Fetch up to `limit` messages older than `before` (newest first).
    async fn channel_history(
        &self,
        channel_id: u64,
        before: Option<u64>,
        limit: u16,
    ) -> Result<Vec<HistoryEntry>, TransportError>;

    async fn delete_message(&self, channel_id: u64, message_id: u64)
    -> Result<(), TransportError>;
}
