//! [`Transport`] implementation over the twilight HTTP client.

use std::sync::Arc;

use async_trait::async_trait;
use twilight_http::Client;
use twilight_model::{
    channel::message::{
        MessageFlags,
        component::{ActionRow, Button, ButtonStyle, Component},
        embed::Embed,
    },
    http::interaction::{InteractionResponse, InteractionResponseType},
    id::{
        Id,
        marker::UserMarker,
    },
};
use twilight_util::builder::{
    InteractionResponseDataBuilder,
    embed::{EmbedBuilder, EmbedFieldBuilder, EmbedFooterBuilder},
};

use kestrel_core::transport::HistoryEntry;
use kestrel_core::{
    Control, ControlStyle, InteractionHandle, MessageHandle, Page, ReplyTarget, Transport,
    TransportError,
};

pub struct TwilightTransport {
    http: Arc<Client>,
    /// Own user id, used to tell the bot's messages apart in history lookups.
    user_id: Id<UserMarker>,
}

impl TwilightTransport {
    pub fn new(http: Arc<Client>, user_id: Id<UserMarker>) -> Self {
        Self { http, user_id }
    }

    async fn respond(
        &self,
        interaction: &InteractionHandle,
        response: InteractionResponse,
    ) -> Result<(), TransportError> {
        self.http
            .interaction(id(interaction.application_id, "application id")?)
            .create_response(
                id(interaction.interaction_id, "interaction id")?,
                &interaction.token,
                &response,
            )
            .await
            .map_err(http_error)?;

        Ok(())
    }
}

#[async_trait]
impl Transport for TwilightTransport {
    async fn send_message(
        &self,
        target: &ReplyTarget,
        page: &Page,
        controls: &[Control],
    ) -> Result<MessageHandle, TransportError> {
        let embeds = render_embeds(page)?;
        let components = render_controls(controls);

        match target {
            ReplyTarget::Channel(channel_id) => {
                let channel = id(*channel_id, "channel id")?;
                let mut request = self
                    .http
                    .create_message(channel)
                    .embeds(&embeds)
                    .components(&components);
                if let Some(content) = page.content.as_deref() {
                    request = request.content(content);
                }

                let message = request
                    .await
                    .map_err(http_error)?
                    .model()
                    .await
                    .map_err(|source| TransportError::Deserialize(source.to_string()))?;

                Ok(MessageHandle::Channel {
                    channel_id: message.channel_id.get(),
                    message_id: message.id.get(),
                })
            }
            ReplyTarget::Interaction { handle, ephemeral } => {
                let mut data = InteractionResponseDataBuilder::new()
                    .embeds(embeds)
                    .components(components);
                if let Some(content) = page.content.as_deref() {
                    data = data.content(content);
                }
                if *ephemeral {
                    data = data.flags(MessageFlags::EPHEMERAL);
                }

                let response = InteractionResponse {
                    kind: InteractionResponseType::ChannelMessageWithSource,
                    data: Some(data.build()),
                };
                self.respond(handle, response).await?;

                Ok(MessageHandle::original_response(handle))
            }
        }
    }

    async fn edit_message(
        &self,
        message: &MessageHandle,
        page: &Page,
        controls: &[Control],
    ) -> Result<(), TransportError> {
        let embeds = render_embeds(page)?;
        let components = render_controls(controls);

        match message {
            MessageHandle::Channel {
                channel_id,
                message_id,
            } => {
                self.http
                    .update_message(id(*channel_id, "channel id")?, id(*message_id, "message id")?)
                    .content(page.content.as_deref())
                    .embeds(Some(embeds.as_slice()))
                    .components(Some(components.as_slice()))
                    .await
                    .map_err(http_error)?;
            }
            MessageHandle::InteractionResponse {
                application_id,
                token,
            } => {
                self.http
                    .interaction(id(*application_id, "application id")?)
                    .update_response(token)
                    .content(page.content.as_deref())
                    .embeds(Some(embeds.as_slice()))
                    .components(Some(components.as_slice()))
                    .await
                    .map_err(http_error)?;
            }
            MessageHandle::Component(interaction) => {
                let mut data = InteractionResponseDataBuilder::new()
                    .embeds(embeds)
                    .components(components);
                if let Some(content) = page.content.as_deref() {
                    data = data.content(content);
                }

                let response = InteractionResponse {
                    kind: InteractionResponseType::UpdateMessage,
                    data: Some(data.build()),
                };
                self.respond(interaction, response).await?;
            }
        }

        Ok(())
    }

    async fn clear_controls(&self, message: &MessageHandle) -> Result<(), TransportError> {
        let empty_components: [Component; 0] = [];

        match message {
            MessageHandle::Channel {
                channel_id,
                message_id,
            } => {
                self.http
                    .update_message(id(*channel_id, "channel id")?, id(*message_id, "message id")?)
                    .components(Some(&empty_components))
                    .await
                    .map_err(http_error)?;
            }
            MessageHandle::InteractionResponse {
                application_id,
                token,
            } => {
                self.http
                    .interaction(id(*application_id, "application id")?)
                    .update_response(token)
                    .components(Some(&empty_components))
                    .await
                    .map_err(http_error)?;
            }
            MessageHandle::Component(interaction) => {
                let response = InteractionResponse {
                    kind: InteractionResponseType::UpdateMessage,
                    data: Some(
                        InteractionResponseDataBuilder::new()
                            .components(empty_components)
                            .build(),
                    ),
                };
                self.respond(interaction, response).await?;
            }
        }

        Ok(())
    }

    async fn respond_ephemeral(
        &self,
        interaction: &InteractionHandle,
        content: &str,
    ) -> Result<(), TransportError> {
        let response = InteractionResponse {
            kind: InteractionResponseType::ChannelMessageWithSource,
            data: Some(
                InteractionResponseDataBuilder::new()
                    .content(content)
                    .flags(MessageFlags::EPHEMERAL)
                    .build(),
            ),
        };

        self.respond(interaction, response).await
    }

    async fn channel_history(
        &self,
        channel_id: u64,
        before: Option<u64>,
        limit: u16,
    ) -> Result<Vec<HistoryEntry>, TransportError> {
        let channel = id(channel_id, "channel id")?;
        let response = match before {
            Some(before) => {
                self.http
                    .channel_messages(channel)
                    .before(id(before, "message id")?)
                    .limit(limit)
                    .await
            }
            None => self.http.channel_messages(channel).limit(limit).await,
        }
        .map_err(http_error)?;

        let messages = response
            .model()
            .await
            .map_err(|source| TransportError::Deserialize(source.to_string()))?;

        Ok(messages
            .into_iter()
            .map(|message| HistoryEntry {
                message_id: message.id.get(),
                from_self: message.author.id == self.user_id,
            })
            .collect())
    }

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<(), TransportError> {
        self.http
            .delete_message(id(channel_id, "channel id")?, id(message_id, "message id")?)
            .await
            .map_err(http_error)?;

        Ok(())
    }
}

fn id<T>(value: u64, what: &'static str) -> Result<Id<T>, TransportError> {
    Id::new_checked(value).ok_or(TransportError::MissingContext(what))
}

fn http_error(source: twilight_http::Error) -> TransportError {
    TransportError::Http(source.to_string())
}

/// Build the twilight embeds of a page.
pub fn render_embeds(page: &Page) -> Result<Vec<Embed>, TransportError> {
    let Some(embed) = page.embed.as_ref() else {
        return Ok(Vec::new());
    };

    let mut builder = EmbedBuilder::new().title(&embed.title).color(embed.color);
    if let Some(url) = embed.url.as_deref() {
        builder = builder.url(url);
    }
    if let Some(description) = embed.description.as_deref() {
        builder = builder.description(description);
    }
    for field in &embed.fields {
        let mut field_builder = EmbedFieldBuilder::new(&field.name, &field.value);
        if field.inline {
            field_builder = field_builder.inline();
        }
        builder = builder.field(field_builder.build());
    }
    if let Some(footer) = embed.footer.as_deref() {
        builder = builder.footer(EmbedFooterBuilder::new(footer).build());
    }

    let embed = builder
        .validate()
        .map_err(|source| TransportError::Validation(source.to_string()))?
        .build();

    Ok(vec![embed])
}

/// Lay controls out as buttons in a single action row.
pub fn render_controls(controls: &[Control]) -> Vec<Component> {
    if controls.is_empty() {
        return Vec::new();
    }

    let buttons = controls
        .iter()
        .map(|control| {
            Component::Button(Button {
                id: None,
                custom_id: Some(control.custom_id.clone()),
                disabled: false,
                emoji: None,
                label: Some(control.label.clone()),
                style: match control.style {
                    ControlStyle::Primary => ButtonStyle::Primary,
                    ControlStyle::Secondary => ButtonStyle::Secondary,
                    ControlStyle::Danger => ButtonStyle::Danger,
                },
                url: None,
                sku_id: None,
            })
        })
        .collect();

    vec![Component::ActionRow(ActionRow {
        id: None,
        components: buttons,
    })]
}
