//! Ping command plugin.
//!
//! Measures and displays Telegram API latency.

use std::time::Instant;

use teloxide::prelude::*;
use teloxide::types::{ParseMode, ReplyParameters};

use crate::bot::dispatcher::ThrottledBot;

/// Handle the /ping command - measures Telegram API latency.
pub async fn ping_command(bot: ThrottledBot, msg: Message) -> anyhow::Result<()> {
    // Measure time to call getMe (lightweight API call)
    let start = Instant::now();
    let _ = bot.get_me().await;
    let ms = start.elapsed().as_millis();

    bot.send_message(msg.chat.id, format!("Pong! <code>{}ms</code>", ms))
        .parse_mode(ParseMode::Html)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;

    Ok(())
}
