use kestrel_core::{CommandInvocation, Context, EmbedPage, Page, ReplyTarget};

use crate::{COMMANDS, CommandMeta};

pub const META: CommandMeta = CommandMeta {
    name: "help",
    desc: "Lists out all available commands.",
    category: "utility",
};

/// Reply with the command catalog grouped by category.
pub async fn run(ctx: Context, command: CommandInvocation) -> anyhow::Result<()> {
    let target = ReplyTarget::Interaction {
        handle: command.interaction,
        ephemeral: true,
    };

    ctx.transport.send_message(&target, &help_page(COMMANDS), &[]).await?;

    Ok(())
}

/// One embed field per category, commands listed in table order.
pub fn help_page(commands: &[CommandMeta]) -> Page {
    let mut categories: Vec<&str> = commands.iter().map(|command| command.category).collect();
    categories.sort_unstable();
    categories.dedup();

    let embed = categories
        .into_iter()
        .fold(EmbedPage::new("Commands"), |embed, category| {
            let listing = commands
                .iter()
                .filter(|command| command.category == category)
                .map(|command| format!("`/{}`: {}", command.name, command.desc))
                .collect::<Vec<_>>()
                .join("\n");
            embed.field(category, listing, false)
        });

    Page::embed(embed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_commands_by_category() {
        let commands = [
            CommandMeta {
                name: "pages",
                desc: "Browse.",
                category: "utility",
            },
            CommandMeta {
                name: "roll",
                desc: "Roll a die.",
                category: "fun",
            },
            CommandMeta {
                name: "about",
                desc: "About.",
                category: "utility",
            },
        ];

        let page = help_page(&commands);
        let fields = &page.embed.as_ref().unwrap().fields;

        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "fun");
        assert_eq!(fields[1].name, "utility");
        assert_eq!(fields[1].value, "`/pages`: Browse.\n`/about`: About.");
    }

    #[test]
    fn catalog_lists_every_registered_command() {
        let page = help_page(COMMANDS);
        let listing: String = page
            .embed
            .unwrap()
            .fields
            .into_iter()
            .map(|field| field.value)
            .collect();

        for command in COMMANDS {
            assert!(listing.contains(&format!("`/{}`", command.name)));
        }
    }
}
