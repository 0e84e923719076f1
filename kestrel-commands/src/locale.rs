//! Localized user-facing messages.

/// Keys of every localized message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocaleMessage {
    About,
    DirectMessageOnly,
    ClearConfirm,
    Clearing,
    ClearDeclined,
    ClearTimedOut,
    DirectMessageCleared,
}

impl LocaleMessage {
    /// Resolve the message for a client locale such as `de` or `en-US`.
    ///
    /// Unknown locales fall back to English.
    pub fn text(self, locale: Option<&str>) -> &'static str {
        let language = locale
            .and_then(|locale| locale.split('-').next())
            .unwrap_or("en");

        match language {
            "de" => self.german(),
            _ => self.english(),
        }
    }

    fn english(self) -> &'static str {
        match self {
            Self::About => "A small Discord bot written in Rust.",
            Self::DirectMessageOnly => "This command only works in direct messages.",
            Self::ClearConfirm => "Delete every message I sent you here?",
            Self::Clearing => "Clearing direct messages...",
            Self::ClearDeclined => "Nothing was deleted.",
            Self::ClearTimedOut => "No answer received, nothing was deleted.",
            Self::DirectMessageCleared => "Direct messages cleared.",
        }
    }

    fn german(self) -> &'static str {
        match self {
            Self::About => "Ein kleiner Discord-Bot, geschrieben in Rust.",
            Self::DirectMessageOnly => "Dieser Befehl funktioniert nur in Direktnachrichten.",
            Self::ClearConfirm => "Alle Nachrichten löschen, die ich dir hier geschickt habe?",
            Self::Clearing => "Direktnachrichten werden gelöscht...",
            Self::ClearDeclined => "Es wurde nichts gelöscht.",
            Self::ClearTimedOut => "Keine Antwort erhalten, es wurde nichts gelöscht.",
            Self::DirectMessageCleared => "Direktnachrichten gelöscht.",
        }
    }
}
