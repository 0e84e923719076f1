//! Transport-agnostic outbound message content.

/// Default embed color used across the bot UI.
pub const DEFAULT_EMBED_COLOR: u32 = 0x90_54_30;

/// Renderable content of one message or page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Page {
    pub content: Option<String>,
    pub embed: Option<EmbedPage>,
}

impl Page {
    /// Plain text page.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            embed: None,
        }
    }

    /// Page rendered as a single embed.
    pub fn embed(embed: EmbedPage) -> Self {
        Self {
            content: None,
            embed: Some(embed),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmbedPage {
    pub title: String,
    pub url: Option<String>,
    pub description: Option<String>,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    pub footer: Option<String>,
}

impl EmbedPage {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: None,
            description: None,
            color: DEFAULT_EMBED_COLOR,
            fields: Vec::new(),
            footer: None,
        }
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    /// Set the footer. Empty text clears it.
    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        let footer = footer.into();
        self.footer = (!footer.is_empty()).then_some(footer);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlStyle {
    Primary,
    Secondary,
    Danger,
}

/// A clickable button attached to a message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Control {
    pub custom_id: String,
    pub label: String,
    pub style: ControlStyle,
}

impl Control {
    pub fn new(custom_id: impl Into<String>, label: impl Into<String>, style: ControlStyle) -> Self {
        Self {
            custom_id: custom_id.into(),
            label: label.into(),
            style,
        }
    }
}
