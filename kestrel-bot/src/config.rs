//! Environment-driven bot configuration.

use std::str::FromStr;

use anyhow::{Context as _, bail};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BotConfig {
    pub token: String,
    pub shard_id: u32,
    pub shard_total: u32,
    /// Overwrite the global slash command list once the shard is ready.
    pub update_commands: bool,
}

impl BotConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let token = lookup("BOT_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .context("BOT_TOKEN is not set")?;

        let shard_id = parse_or(&lookup, "BOT_SHARD_ID", 0)?;
        let shard_total = parse_or(&lookup, "BOT_SHARD_TOTAL", 1)?;
        if shard_id >= shard_total {
            bail!("BOT_SHARD_ID ({shard_id}) must be lower than BOT_SHARD_TOTAL ({shard_total})");
        }

        let update_commands = parse_or(&lookup, "BOT_UPDATE_COMMANDS", false)?;

        Ok(Self {
            token,
            shard_id,
            shard_total,
            update_commands,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}
