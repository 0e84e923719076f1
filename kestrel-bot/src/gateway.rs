//! Gateway adapter: twilight events into the bot's own event model.

use twilight_model::application::interaction::{Interaction, InteractionData};
use twilight_model::gateway::event::Event as GatewayEvent;

use kestrel_core::{ButtonClick, CommandInvocation, Event, InteractionHandle, Ready};

/// Convert one gateway event. Anything the bot does not react to becomes
/// [`Event::Other`] carrying the gateway event name.
pub fn translate(event: GatewayEvent) -> Event {
    match event {
        GatewayEvent::Ready(ready) => Event::Ready(Ready {
            application_id: ready.application.id.get(),
            user_name: ready.user.name.clone(),
            shard: ready.shard.map(|shard| (shard.number(), shard.total())),
        }),
        GatewayEvent::InteractionCreate(interaction) => translate_interaction(&interaction),
        other => Event::Other {
            kind: format!("{:?}", other.kind()),
        },
    }
}

fn translate_interaction(interaction: &Interaction) -> Event {
    let other = || Event::Other {
        kind: format!("{:?}", interaction.kind),
    };

    let Some(actor) = interaction.author_id().map(|id| id.get()) else {
        return other();
    };
    let channel_id = interaction.channel.as_ref().map(|channel| channel.id.get());
    let handle = InteractionHandle::new(
        interaction.application_id.get(),
        interaction.id.get(),
        interaction.token.clone(),
    );

    match &interaction.data {
        Some(InteractionData::MessageComponent(data)) => Event::ButtonClicked(ButtonClick {
            component_id: data.custom_id.clone(),
            actor,
            channel_id,
            interaction: handle,
        }),
        Some(InteractionData::ApplicationCommand(data)) => Event::Command(CommandInvocation {
            name: data.name.clone(),
            actor,
            channel_id,
            guild_id: interaction.guild_id.map(|id| id.get()),
            locale: interaction.locale.clone(),
            interaction: handle,
        }),
        _ => other(),
    }
}

#[cfg(test)]
mod tests {
    use kestrel_core::EventKind;

    use super::*;

    #[test]
    fn unhandled_events_keep_their_name() {
        let event = translate(GatewayEvent::GatewayHeartbeatAck);

        assert_eq!(event.kind(), EventKind::Other);
        assert_eq!(
            event,
            Event::Other {
                kind: "GatewayHeartbeatAck".to_owned()
            }
        );
    }
}
