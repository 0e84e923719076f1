use kestrel_core::{CommandInvocation, Context, EmbedPage, Page, ReplyTarget};

use crate::CommandMeta;
use crate::locale::LocaleMessage;

pub const META: CommandMeta = CommandMeta {
    name: "about",
    desc: "Shows more information about this bot.",
    category: "utility",
};

const SOURCE_URL: &str = env!("CARGO_PKG_REPOSITORY");

/// Reply with an ephemeral embed describing this bot and its runtime.
pub async fn run(ctx: Context, command: CommandInvocation) -> anyhow::Result<()> {
    let page = about_page(command.locale.as_deref(), ctx.shard);
    let target = ReplyTarget::Interaction {
        handle: command.interaction,
        ephemeral: true,
    };

    ctx.transport.send_message(&target, &page, &[]).await?;

    Ok(())
}

pub fn about_page(locale: Option<&str>, (shard_id, shard_total): (u32, u32)) -> Page {
    let system = format!(
        "{} ({})",
        std::env::consts::OS,
        std::env::consts::ARCH
    );

    Page::embed(
        EmbedPage::new("About")
            .url(SOURCE_URL)
            .description(LocaleMessage::About.text(locale))
            .field("Version", env!("CARGO_PKG_VERSION"), true)
            .field("Language", "[Rust](https://www.rust-lang.org)", true)
            .field("Framework", "[twilight](https://twilight.rs)", true)
            .field("Shard", format!("{shard_id}/{shard_total}"), true)
            .field("Operating System", system, true)
            .footer(format!("Source: {SOURCE_URL}")),
    )
}
