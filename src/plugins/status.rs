//! /status command - group subscription and admin status.

use teloxide::prelude::*;
use teloxide::types::ReplyParameters;

use crate::bot::dispatcher::{AppState, ThrottledBot};

pub async fn status_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let chat_id = msg.chat.id.0;

    let valid = state.permissions.is_group_valid(chat_id).await?;
    let admin = match msg.from.as_ref() {
        Some(user) => {
            state
                .permissions
                .is_group_admin(chat_id, user.id.0 as i64)
                .await?
        }
        None => false,
    };

    let text = format!(
        "Group: {}\nYou are a group admin: {}",
        if valid { "active" } else { "not registered or expired" },
        if admin { "yes" } else { "no" },
    );

    bot.send_message(msg.chat.id, text)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;

    Ok(())
}
