// src/notifier/messages.rs

use super::ui::show_panel;
use crate::shell::{session::parse_amount, SessionStore};
use teloxide::prelude::*;
use teloxide::types::Message;
use tracing::{info, warn};

pub async fn handle_message(bot: Bot, msg: Message, store: SessionStore) -> anyhow::Result<()> {
    let chat_id = msg.chat.id;
    let text = msg.text().unwrap_or("").trim();

    let awaiting = store.snapshot(chat_id).await.awaiting_amount;

    // Число принимаем и без нажатия "Amount"; проверка суммы всё равно при конвертации
    if awaiting || parse_amount(text).is_some() {
        store.update(chat_id, |s| s.set_amount(text)).await;
        info!("Chat {}: amount set to '{}'", chat_id, text);

        if let Err(e) = bot.delete_message(chat_id, msg.id).await {
            warn!("Failed to delete user message {}: {}", msg.id.0, e);
        }
        show_panel(&bot, chat_id, &store).await?;
    } else {
        bot.send_message(chat_id, "Send an amount, or use /start to open the converter.")
            .await?;
    }

    Ok(())
}
