//! /help command plugin.

use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use super::Command;
use crate::bot::dispatcher::ThrottledBot;

pub async fn help_command(bot: ThrottledBot, msg: Message) -> anyhow::Result<()> {
    bot.send_message(msg.chat.id, Command::descriptions().to_string())
        .await?;
    Ok(())
}
