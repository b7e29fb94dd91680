//! /plugins command - lists the caller's available plugins in this group.

use teloxide::prelude::*;
use teloxide::types::ReplyParameters;

use crate::bot::dispatcher::{AppState, ThrottledBot};

pub async fn plugins_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    if !(msg.chat.is_group() || msg.chat.is_supergroup()) {
        bot.send_message(msg.chat.id, "Use /plugins inside a group.")
            .await?;
        return Ok(());
    }

    let user_id = msg.from.as_ref().map(|u| u.id.0 as i64);
    let mut names = state
        .permissions
        .get_available_plugins(msg.chat.id.0, user_id)
        .await?;
    names.sort();

    let text = if names.is_empty() {
        "No plugins are available to you in this group.".to_string()
    } else {
        let lines: Vec<String> = names.iter().map(|n| format!("• {n}")).collect();
        format!("Available plugins:\n{}", lines.join("\n"))
    };

    bot.send_message(msg.chat.id, text)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;

    Ok(())
}
