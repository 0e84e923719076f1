mod config;
mod gateway;
mod transport;

use std::sync::Arc;

use anyhow::Context as _;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use twilight_gateway::{EventTypeFlags, Intents, Shard, ShardId, StreamExt as _};
use twilight_http::Client;
use twilight_model::application::command::{Command, CommandType};
use twilight_model::id::Id;
use twilight_util::builder::command::CommandBuilder;

use rustls::crypto::ring::default_provider;

use kestrel_commands::{COMMANDS, bind_commands};
use kestrel_core::{AwaitError, Context, ListenerRegistry, Ready};

use crate::config::BotConfig;
use crate::transport::TwilightTransport;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    // Load the .env file
    dotenvy::dotenv().ok();
    let config = BotConfig::from_env()?;

    // Create a single shared HTTP Client
    let http = Arc::new(Client::new(config.token.clone()));
    let user = http
        .current_user()
        .await
        .context("failed to fetch the bot user")?
        .model()
        .await?;

    let registry = ListenerRegistry::new();
    let transport = Arc::new(TwilightTransport::new(Arc::clone(&http), user.id));
    let ctx = Context::new(
        transport,
        registry.clone(),
        (config.shard_id, config.shard_total),
    );
    bind_commands(&ctx);

    // Subscribed here, before the shard exists
    let ready = ctx.correlator().next_any::<Ready>(None);
    let ready = tokio::spawn(await_ready(ready, Arc::clone(&http), config.update_commands));

    // Slash commands and component clicks arrive without privileged intents
    let intents = Intents::GUILDS | Intents::DIRECT_MESSAGES;
    let mut shard = Shard::new(
        ShardId::new(config.shard_id, config.shard_total),
        config.token,
        intents,
    );

    info!(shard = config.shard_id, total = config.shard_total, "kestrel is connecting...");

    loop {
        let item = tokio::select! {
            item = shard.next_event(EventTypeFlags::all()) => item,
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown requested");
                break;
            }
        };

        let Some(item) = item else {
            break;
        };

        let event = match item {
            Ok(event) => event,
            Err(source) => {
                error!(?source, "gateway event stream error");
                continue;
            }
        };

        registry.dispatch(gateway::translate(event));
    }

    ready.abort();
    // Listeners hold the context, so they must be dropped explicitly
    registry.clear();

    Ok(()) // Return Success, shutdown cleanly
}

/// Wait for the shard to become ready, then optionally publish the slash commands.
async fn await_ready(
    ready: impl Future<Output = Result<Ready, AwaitError>>,
    http: Arc<Client>,
    update_commands: bool,
) {
    if let Err(source) = on_ready(ready, &http, update_commands).await {
        error!(?source, "ready handling failed");
    }
}

async fn on_ready(
    ready: impl Future<Output = Result<Ready, AwaitError>>,
    http: &Client,
    update_commands: bool,
) -> anyhow::Result<()> {
    let ready = ready.await?;
    info!(user = %ready.user_name, shard = ?ready.shard, "kestrel has successfully awoken!");

    if !update_commands {
        return Ok(());
    }

    let commands: Vec<Command> = COMMANDS
        .iter()
        .map(|meta| CommandBuilder::new(meta.name, meta.desc, CommandType::ChatInput).build())
        .collect();
    let application_id =
        Id::new_checked(ready.application_id).context("ready event carried no application id")?;

    http.interaction(application_id)
        .set_global_commands(&commands)
        .await
        .context("failed to overwrite global commands")?;
    info!(count = commands.len(), "global commands updated");

    Ok(())
}
