// src/notifier/ui.rs

use super::callback_data;
use crate::currency::CURRENCIES;
use crate::shell::{render, ConverterSession, SessionStore};
use teloxide::prelude::*;
use teloxide::types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, MessageId, ParseMode};
use teloxide::{ApiError, RequestError};
use tracing::warn;

const PICKER_COLUMNS: usize = 3;

/// Клавиатура панели конвертера
pub fn make_panel_keyboard(session: &ConverterSession) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback(
            format!("✏️ Amount: {}", session.amount),
            callback_data::ENTER_AMOUNT,
        )],
        vec![
            InlineKeyboardButton::callback(
                format!("From: {} {}", session.source.flag, session.source.code),
                callback_data::PICK_SOURCE,
            ),
            InlineKeyboardButton::callback("⇄", callback_data::SWAP),
            InlineKeyboardButton::callback(
                format!("To: {} {}", session.target.flag, session.target.code),
                callback_data::PICK_TARGET,
            ),
        ],
        vec![InlineKeyboardButton::callback("🔁 Convert Now", callback_data::CONVERT)],
    ])
}

/// Выбор валюты из каталога; `prefix` определяет, какую сторону меняем
pub fn make_currency_picker(prefix: &str, selected: &str) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = CURRENCIES
        .chunks(PICKER_COLUMNS)
        .map(|chunk| {
            chunk
                .iter()
                .map(|c| {
                    let mark = if c.code == selected { "✅ " } else { "" };
                    InlineKeyboardButton::callback(
                        format!("{}{} {}", mark, c.flag, c.code),
                        format!("{}{}", prefix, c.code),
                    )
                })
                .collect()
        })
        .collect();
    rows.push(vec![InlineKeyboardButton::callback("⬅️ Back", callback_data::BACK_TO_PANEL)]);
    InlineKeyboardMarkup::new(rows)
}

/// Показывает панель: редактирует сохранённое сообщение или отправляет новое
pub async fn show_panel(bot: &Bot, chat_id: ChatId, store: &SessionStore) -> Result<(), RequestError> {
    let session = store.snapshot(chat_id).await;
    let text = render::render_panel(&session);
    let kb = make_panel_keyboard(&session);

    if let Some(id) = session.panel_message_id {
        match bot
            .edit_message_text(chat_id, MessageId(id), &text)
            .parse_mode(ParseMode::Html)
            .reply_markup(kb.clone())
            .await
        {
            Ok(_) | Err(RequestError::Api(ApiError::MessageNotModified)) => return Ok(()),
            Err(e) => warn!("Failed to edit panel {} in chat {}: {}. Sending new one.", id, chat_id, e),
        }
    }

    let sent = bot
        .send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .reply_markup(kb)
        .await?;
    store.update(chat_id, |s| s.panel_message_id = Some(sent.id.0)).await;
    Ok(())
}

/// Отправляет новую панель внизу чата, старую забываем
pub async fn send_new_panel(bot: &Bot, chat_id: ChatId, store: &SessionStore) -> Result<(), RequestError> {
    store.update(chat_id, |s| s.panel_message_id = None).await;
    show_panel(bot, chat_id, store).await
}
