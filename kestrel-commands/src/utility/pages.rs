use kestrel_core::{CommandInvocation, Context, ReplyTarget};
use kestrel_utils::pagination::{DEFAULT_DURATION, Paginator, list_pages, only_actor, send_paginator};

use crate::CommandMeta;

pub const META: CommandMeta = CommandMeta {
    name: "pages",
    desc: "Browse a sample list with paginator buttons.",
    category: "utility",
};

const ITEMS_PER_PAGE: usize = 5;

/// Send a paginator over sample items that only the invoker can navigate.
pub async fn run(ctx: Context, command: CommandInvocation) -> anyhow::Result<()> {
    let pages = list_pages("Pagination Test", &build_sample_items(), ITEMS_PER_PAGE);
    let paginator = Paginator::new(pages, DEFAULT_DURATION)?.with_filter(only_actor(command.actor));

    let target = ReplyTarget::Interaction {
        handle: command.interaction,
        ephemeral: false,
    };
    send_paginator(&ctx, target, paginator).await?;

    Ok(())
}

fn build_sample_items() -> Vec<String> {
    (1..=24)
        .map(|index| format!("Sample pagination item #{index}"))
        .collect()
}
