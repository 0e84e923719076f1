//! Inbound event model delivered to listeners.

use crate::transport::InteractionHandle;

/// Discriminant of an [`Event`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Ready,
    ButtonClicked,
    Command,
    Other,
}

/// A single gateway event, immutable once dispatched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// The session is established and the bot user is known.
    Ready(Ready),
    /// A message component button was pressed.
    ButtonClicked(ButtonClick),
    /// A slash command was invoked.
    Command(CommandInvocation),
    /// Any other gateway event. Only its name is kept.
    Other { kind: String },
}

impl Event {
    /// Return this event's discriminant.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Ready(_) => EventKind::Ready,
            Self::ButtonClicked(_) => EventKind::ButtonClicked,
            Self::Command(_) => EventKind::Command,
            Self::Other { .. } => EventKind::Other,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ready {
    pub application_id: u64,
    pub user_name: String,
    /// `(shard id, shard total)` when the gateway reported one.
    pub shard: Option<(u32, u32)>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ButtonClick {
    /// Raw custom id of the pressed button.
    pub component_id: String,
    /// User that pressed the button.
    pub actor: u64,
    pub channel_id: Option<u64>,
    /// Interaction used to acknowledge the click or update its message.
    pub interaction: InteractionHandle,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandInvocation {
    /// Command name, lower-case as registered.
    pub name: String,
    /// User that invoked the command.
    pub actor: u64,
    pub channel_id: Option<u64>,
    pub guild_id: Option<u64>,
    /// Client locale reported by the interaction, e.g. `en-US`.
    pub locale: Option<String>,
    pub interaction: InteractionHandle,
}

impl CommandInvocation {
    /// Whether this command was invoked outside of a guild.
    pub fn is_direct_message(&self) -> bool {
        self.guild_id.is_none()
    }
}

/// Typed view into an [`Event`].
///
/// Listeners that only care about one kind of event extract it through this
/// trait instead of matching on the union themselves. [`Event`] implements it
/// too and matches everything.
pub trait EventPayload: Clone + Send + Sync + 'static {
    /// Borrow the payload when `event` carries one of this type.
    fn from_event(event: &Event) -> Option<&Self>;
}

impl EventPayload for Event {
    fn from_event(event: &Event) -> Option<&Self> {
        Some(event)
    }
}

impl EventPayload for Ready {
    fn from_event(event: &Event) -> Option<&Self> {
        match event {
            Event::Ready(ready) => Some(ready),
            _ => None,
        }
    }
}

impl EventPayload for ButtonClick {
    fn from_event(event: &Event) -> Option<&Self> {
        match event {
            Event::ButtonClicked(click) => Some(click),
            _ => None,
        }
    }
}

impl EventPayload for CommandInvocation {
    fn from_event(event: &Event) -> Option<&Self> {
        match event {
            Event::Command(command) => Some(command),
            _ => None,
        }
    }
}
