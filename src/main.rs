//! Aegis - Plugin access control for a multi-tenant Telegram bot.
//!
//! Each group gets a configurable set of plugins; each plugin has a
//! global enable flag and per-user whitelist/blacklist overrides.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `database` - MongoDB record store for plugins and groups
//! - `registry` - Plugins registered in this process
//! - `cache` - TTL views over the plugin catalog and groups (Moka)
//! - `permissions` - Per-request plugin access resolution
//! - `admin` - Admin operations and HTTP API (axum)
//! - `bot` - Telegram dispatcher (with Throttle for API rate limiting)
//! - `plugins` - Built-in command plugins

mod admin;
mod bot;
mod cache;
mod config;
mod database;
mod permissions;
mod plugins;
mod registry;

use std::sync::Arc;

use teloxide::adaptors::throttle::Limits;
use teloxide::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use admin::AdminService;
use cache::{CacheConfig, CacheRegistry, ConfigCache};
use config::Config;
use database::{Database, MongoStore, RecordStore};
use permissions::PermissionResolver;
use registry::RegistrationTracker;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // If RUST_LOG is not set, default to "info" level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("aegis=info,teloxide=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting Aegis...");

    let config = Config::from_env()?;
    info!("Configuration loaded successfully");
    info!("Bot mode: {:?}", config.bot_mode);
    info!(
        "Cache TTL: plugins {:?}, groups {:?}",
        config.plugin_cache_ttl, config.group_cache_ttl
    );

    info!("Connecting to MongoDB...");
    let db = Database::connect(&config.mongodb_uri, &config.mongodb_database).await?;
    db.initialize().await?;
    let store: Arc<dyn RecordStore> = Arc::new(MongoStore::new(&db));
    info!("Database connected");

    let tracker = Arc::new(RegistrationTracker::new(store.clone()));
    plugins::register_builtin(&tracker).await?;

    let cache_registry = CacheRegistry::new();
    let cache = ConfigCache::new(
        store.clone(),
        tracker.clone(),
        &cache_registry,
        CacheConfig::snapshot(config.plugin_cache_ttl),
        CacheConfig::snapshot(config.group_cache_ttl),
    );
    let permissions = PermissionResolver::new(cache);

    // Admin API runs beside the bot; its failure does not stop the bot
    let admin = Arc::new(AdminService::new(store, tracker));
    let admin_addr = config.admin_addr;
    tokio::spawn(async move {
        if let Err(e) = admin::serve(admin_addr, admin).await {
            error!("Admin API stopped: {:#}", e);
        }
    });

    // Throttle respects Telegram's global and per-chat rate limits
    let bot = Bot::new(&config.bot_token).throttle(Limits::default());
    let me = bot.get_me().await?;
    info!("Bot username: @{}", me.username());

    let dispatcher = bot::build_dispatcher(bot.clone(), permissions, me.username().to_string());

    bot::run(&config, dispatcher, bot).await
}
