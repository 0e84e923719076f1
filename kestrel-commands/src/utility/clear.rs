use std::time::Duration;

use tracing::{debug, warn};

use kestrel_core::{
    AwaitError, ButtonClick, CommandInvocation, Context, MessageHandle, Page, ReplyTarget,
    Transport,
};
use kestrel_utils::interaction::{
    ConfirmationAction, build_confirmation_controls, parse_confirmation_custom_id,
};
use kestrel_utils::pagination::generate_nonce;

use crate::CommandMeta;
use crate::locale::LocaleMessage;

pub const META: CommandMeta = CommandMeta {
    name: "clear",
    desc: "Deletes the messages this bot sent you in direct messages.",
    category: "utility",
};

const CONFIRM_TIMEOUT: Duration = Duration::from_secs(30);
const HISTORY_PAGE_SIZE: u16 = 100;
const HISTORY_PAGE_DELAY: Duration = Duration::from_millis(1100);

/// Ask for confirmation, then delete every bot message in the invoker's DM channel.
pub async fn run(ctx: Context, command: CommandInvocation) -> anyhow::Result<()> {
    let locale = command.locale.as_deref();
    let target = ReplyTarget::Interaction {
        handle: command.interaction.clone(),
        ephemeral: true,
    };

    let Some(channel_id) = command
        .channel_id
        .filter(|_| command.is_direct_message())
    else {
        let page = Page::text(LocaleMessage::DirectMessageOnly.text(locale));
        ctx.transport.send_message(&target, &page, &[]).await?;
        return Ok(());
    };

    let nonce = generate_nonce();
    let actor = command.actor;
    let expected = nonce.clone();
    // Subscribed before the prompt goes out so an immediate click is not lost
    let answer = ctx.correlator().next(
        move |click: &ButtonClick| {
            click.actor == actor
                && parse_confirmation_custom_id(&click.component_id, &expected).is_some()
        },
        Some(CONFIRM_TIMEOUT),
    );

    let prompt = ctx
        .transport
        .send_message(
            &target,
            &Page::text(LocaleMessage::ClearConfirm.text(locale)),
            &build_confirmation_controls(&nonce),
        )
        .await?;

    let click = match answer.await {
        Ok(click) => click,
        Err(AwaitError::TimedOut) => {
            debug!(channel_id, "clear confirmation timed out");
            let page = Page::text(LocaleMessage::ClearTimedOut.text(locale));
            ctx.transport.edit_message(&prompt, &page, &[]).await?;
            return Ok(());
        }
        Err(source) => return Err(source.into()),
    };

    let answered = MessageHandle::Component(click.interaction.clone());
    match parse_confirmation_custom_id(&click.component_id, &nonce) {
        Some(ConfirmationAction::Confirm) => {
            let page = Page::text(LocaleMessage::Clearing.text(locale));
            ctx.transport.edit_message(&answered, &page, &[]).await?;

            let deleted = clear_own_messages(ctx.transport.as_ref(), channel_id).await?;
            debug!(channel_id, deleted, "cleared direct messages");

            let page = Page::text(format!(
                "{} ({deleted})",
                LocaleMessage::DirectMessageCleared.text(locale)
            ));
            ctx.transport.edit_message(&prompt, &page, &[]).await?;
        }
        Some(ConfirmationAction::Decline) | None => {
            let page = Page::text(LocaleMessage::ClearDeclined.text(locale));
            ctx.transport.edit_message(&answered, &page, &[]).await?;
        }
    }

    Ok(())
}

/// Delete every message the bot authored in `channel_id`.
///
/// Returns the number of messages deleted. Single failed deletes are logged
/// and skipped.
pub async fn clear_own_messages(transport: &dyn Transport, channel_id: u64) -> anyhow::Result<u64> {
    let mut before = None;
    let mut deleted = 0_u64;

    loop {
        let history = transport
            .channel_history(channel_id, before, HISTORY_PAGE_SIZE)
            .await?;

        let Some(oldest) = history.last() else {
            break;
        };
        before = Some(oldest.message_id);

        for entry in history.iter().filter(|entry| entry.from_self) {
            match transport.delete_message(channel_id, entry.message_id).await {
                Ok(()) => deleted += 1,
                Err(source) => {
                    warn!(?source, channel_id, message_id = entry.message_id, "failed to delete message");
                }
            }
        }

        tokio::time::sleep(HISTORY_PAGE_DELAY).await;
    }

    Ok(deleted)
}
