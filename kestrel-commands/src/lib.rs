pub mod locale;
pub mod utility;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use kestrel_core::{
    CommandInvocation, Context, Event, EventKind, EventPayload, Listener, ListenerControl,
    ListenerId,
};

// Global command meta data
pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
}

pub const COMMANDS: &[CommandMeta] = &[
    utility::about::META,
    utility::clear::META,
    utility::help::META,
    utility::pages::META,
    // Add new commands here
];

/// Run the handler registered for `command.name`.
pub async fn handle_command(ctx: Context, command: CommandInvocation) -> anyhow::Result<()> {
    match command.name.as_str() {
        "about" => utility::about::run(ctx, command).await?,
        "clear" => utility::clear::run(ctx, command).await?,
        "help" => utility::help::run(ctx, command).await?,
        "pages" => utility::pages::run(ctx, command).await?,
        // Add new commands here
        other => debug!(command = other, "ignoring unknown command"),
    }

    Ok(())
}

/// Listener routing slash command invocations to their handlers.
///
/// Every invocation runs on its own task, so a command waiting on user input
/// does not hold up the next one.
pub struct CommandRouter {
    ctx: Context,
}

impl CommandRouter {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Listener for CommandRouter {
    fn accepts(&self, event: &Event) -> bool {
        event.kind() == EventKind::Command
    }

    async fn on_event(&self, event: &Event) -> ListenerControl {
        let Some(command) = CommandInvocation::from_event(event).cloned() else {
            return ListenerControl::Continue;
        };

        let ctx = self.ctx.clone();
        tokio::spawn(async move {
            let name = command.name.clone();
            if let Err(source) = handle_command(ctx, command).await {
                error!(?source, command = %name, "command handler failed");
            }
        });

        ListenerControl::Continue
    }
}

/// Register the command router on the context's registry.
pub fn bind_commands(ctx: &Context) -> ListenerId {
    ctx.registry
        .add(Arc::new(CommandRouter::new(ctx.clone())))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use kestrel_core::testing::MockTransport;
    use kestrel_core::{CommandInvocation, Context, InteractionHandle, ListenerRegistry};

    pub fn context() -> (Context, Arc<MockTransport>) {
        let transport = Arc::new(MockTransport::new());
        let ctx = Context::new(transport.clone(), ListenerRegistry::new(), (0, 1));
        (ctx, transport)
    }

    pub fn invocation(name: &str, guild_id: Option<u64>) -> CommandInvocation {
        CommandInvocation {
            name: name.to_owned(),
            actor: 7,
            channel_id: Some(50),
            guild_id,
            locale: None,
            interaction: InteractionHandle::new(1, 500, "command-token"),
        }
    }

    pub async fn settle() {
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use kestrel_core::testing::Recorded;

    use super::test_support::{context, invocation, settle};
    use super::*;

    #[test]
    fn command_names_are_unique() {
        let mut names: Vec<&str> = COMMANDS.iter().map(|command| command.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), COMMANDS.len());
    }

    #[tokio::test]
    async fn router_dispatches_commands() {
        let (ctx, transport) = context();
        bind_commands(&ctx);

        ctx.registry
            .dispatch(Event::Command(invocation("about", None)));
        settle().await;

        assert!(matches!(
            transport.calls().first(),
            Some(Recorded::Sent { .. })
        ));
    }

    #[tokio::test]
    async fn unknown_commands_are_ignored() {
        let (ctx, transport) = context();

        handle_command(ctx, invocation("nope", None)).await.unwrap();
        assert!(transport.calls().is_empty());
    }
}
