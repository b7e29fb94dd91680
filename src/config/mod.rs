//! Configuration module for Aegis.
//!
//! Loads configuration from environment variables.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::cache::DEFAULT_TTL;

/// Bot running mode
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BotMode {
    #[default]
    Polling,
    Webhook,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    // Telegram
    pub bot_token: String,
    pub bot_mode: BotMode,
    pub webhook_url: Option<String>,
    pub webhook_port: u16,
    pub webhook_secret: Option<String>,

    // MongoDB
    pub mongodb_uri: String,
    pub mongodb_database: String,

    /// Listen address of the admin API.
    pub admin_addr: SocketAddr,

    /// Refresh window of the plugin catalog view.
    pub plugin_cache_ttl: Duration,

    /// Refresh window of the group view.
    pub group_cache_ttl: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    /// Fails if a required variable is missing or a value does not parse.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let bot_mode = match env::var("BOT_MODE")
            .unwrap_or_else(|_| "polling".to_string())
            .to_lowercase()
            .as_str()
        {
            "webhook" => BotMode::Webhook,
            _ => BotMode::Polling,
        };

        let webhook_url = env::var("WEBHOOK_URL").ok();

        // Validate webhook URL is set if mode is webhook
        if bot_mode == BotMode::Webhook && webhook_url.is_none() {
            bail!("WEBHOOK_URL must be set when BOT_MODE is webhook");
        }

        let webhook_port = match env::var("WEBHOOK_PORT") {
            Ok(port) => port.parse().context("WEBHOOK_PORT must be a port number")?,
            Err(_) => 8443,
        };

        let admin_addr = env::var("ADMIN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("ADMIN_ADDR must be a socket address")?;

        let default_ttl = ttl_from_env("CACHE_TTL_SECS")?.unwrap_or(DEFAULT_TTL);

        Ok(Self {
            bot_token: env::var("BOT_TOKEN").context("BOT_TOKEN must be set")?,
            bot_mode,
            webhook_url,
            webhook_port,
            webhook_secret: env::var("WEBHOOK_SECRET").ok().filter(|s| !s.is_empty()),
            mongodb_uri: env::var("MONGODB_URI").context("MONGODB_URI must be set")?,
            mongodb_database: env::var("MONGODB_DATABASE")
                .unwrap_or_else(|_| "aegis".to_string()),
            admin_addr,
            plugin_cache_ttl: ttl_from_env("PLUGIN_CACHE_TTL_SECS")?.unwrap_or(default_ttl),
            group_cache_ttl: ttl_from_env("GROUP_CACHE_TTL_SECS")?.unwrap_or(default_ttl),
        })
    }
}

fn ttl_from_env(key: &str) -> Result<Option<Duration>> {
    env::var(key).ok().map(|raw| parse_ttl(key, &raw)).transpose()
}

/// Parse a TTL given in whole seconds.
fn parse_ttl(key: &str, raw: &str) -> Result<Duration> {
    let secs: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("{key} must be a number of seconds, got {raw:?}"))?;
    Ok(Duration::from_secs(secs))
}
