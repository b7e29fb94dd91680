//! /start command plugin.

use teloxide::prelude::*;

use crate::bot::dispatcher::{AppState, ThrottledBot};

/// Handle the /start command.
pub async fn start_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let text = format!(
        "Hi! I'm @{}.\n\n\
         Plugins are enabled per group by the operators of this bot. \
         Use /plugins in a group to see what you can use there, \
         or /help for the command list.",
        state.bot_username
    );

    bot.send_message(msg.chat.id, text).await?;

    Ok(())
}
