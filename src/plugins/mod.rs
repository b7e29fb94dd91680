//! Built-in plugins and command dispatch.
//!
//! Add new plugins by:
//! 1. Creating a new file in this directory
//! 2. Adding it to `BUILTIN_PLUGINS` and to `Command`
//! 3. Routing the command in `handle_command()`
//!
//! Every command passes the access gate before its handler runs.

pub mod gate;
pub mod help;
pub mod list;
pub mod ping;
pub mod start;
pub mod status;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::ReplyParameters;
use teloxide::utils::command::BotCommands;
use tracing::{debug, info};

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::StoreResult;
use crate::registry::RegistrationTracker;

/// A plugin implemented in this process.
#[derive(Debug)]
pub struct BuiltinPlugin {
    pub name: &'static str,
    pub internal: bool,
}

const START: BuiltinPlugin = BuiltinPlugin { name: "start", internal: true };
const HELP: BuiltinPlugin = BuiltinPlugin { name: "help", internal: true };
const PLUGINS: BuiltinPlugin = BuiltinPlugin { name: "plugins", internal: true };
const STATUS: BuiltinPlugin = BuiltinPlugin { name: "status", internal: true };
const PING: BuiltinPlugin = BuiltinPlugin { name: "ping", internal: false };

/// Plugins registered at startup.
pub const BUILTIN_PLUGINS: &[BuiltinPlugin] = &[START, HELP, PLUGINS, STATUS, PING];

/// All bot commands.
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Start the bot")]
    Start,

    #[command(description = "Show this help")]
    Help,

    #[command(description = "List the plugins you can use here")]
    Plugins,

    #[command(description = "Show group subscription and admin status")]
    Status,

    #[command(description = "Check bot latency")]
    Ping,
}

impl Command {
    /// Plugin this command belongs to.
    pub fn plugin(&self) -> &'static BuiltinPlugin {
        match self {
            Self::Start => &START,
            Self::Help => &HELP,
            Self::Plugins => &PLUGINS,
            Self::Status => &STATUS,
            Self::Ping => &PING,
        }
    }
}

/// Register every built-in plugin with the tracker.
pub async fn register_builtin(tracker: &RegistrationTracker) -> StoreResult<()> {
    for plugin in BUILTIN_PLUGINS {
        tracker
            .register_plugin(plugin.name, plugin.internal, false)
            .await?;
    }
    info!("Registered {} built-in plugins", BUILTIN_PLUGINS.len());
    Ok(())
}

/// Build the command handler.
pub fn command_handler() -> UpdateHandler<anyhow::Error> {
    teloxide::filter_command::<Command, _>().endpoint(handle_command)
}

/// Gate a command, then route it to its plugin.
async fn handle_command(
    bot: ThrottledBot,
    msg: Message,
    cmd: Command,
    state: AppState,
) -> anyhow::Result<()> {
    let is_group = msg.chat.is_group() || msg.chat.is_supergroup();
    let user_id = msg.from.as_ref().map(|u| u.id.0 as i64);

    let access = gate::check_access(
        &state.permissions,
        cmd.plugin(),
        is_group,
        msg.chat.id.0,
        user_id,
    )
    .await?;

    if let Some(notice) = access.notice() {
        debug!("Denied /{} in chat {}: {:?}", cmd.plugin().name, msg.chat.id, access);
        bot.send_message(msg.chat.id, notice)
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
        return Ok(());
    }

    match cmd {
        Command::Start => start::start_command(bot, msg, state).await,
        Command::Help => help::help_command(bot, msg).await,
        Command::Plugins => list::plugins_command(bot, msg, state).await,
        Command::Status => status::status_command(bot, msg, state).await,
        Command::Ping => ping::ping_command(bot, msg).await,
    }
}
