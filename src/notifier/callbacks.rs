// src/notifier/callbacks.rs

use super::callback_data;
use super::conversion::trigger_conversion;
use super::ui::{make_currency_picker, show_panel};
use crate::currency;
use crate::estimator::RateEstimator;
use crate::shell::SessionStore;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, ParseMode};
use tracing::{info, warn};

pub async fn handle_callback<E>(
    bot: Bot,
    q: CallbackQuery,
    store: SessionStore,
    estimator: Arc<E>,
) -> anyhow::Result<()>
where
    E: RateEstimator + ?Sized + 'static,
{
    let (Some(data), Some(message)) = (q.data.as_deref(), q.message.as_ref()) else {
        warn!("Callback {:?} without data or message", q.id);
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };
    let chat_id = message.chat().id;
    let message_id = message.id();
    info!("Callback '{}' from chat {}", data, chat_id);

    // Панель, на которой нажали кнопку, становится текущей
    store.update(chat_id, |s| s.panel_message_id = Some(message_id.0)).await;

    match data {
        callback_data::ENTER_AMOUNT => {
            store.update(chat_id, |s| s.awaiting_amount = true).await;
            bot.answer_callback_query(q.id.clone())
                .text("Send the amount as a message")
                .await?;
            return Ok(());
        }
        callback_data::PICK_SOURCE | callback_data::PICK_TARGET => {
            let session = store.snapshot(chat_id).await;
            let (prefix, selected, title) = if data == callback_data::PICK_SOURCE {
                (callback_data::PREFIX_SET_SOURCE, session.source.code, "Convert from:")
            } else {
                (callback_data::PREFIX_SET_TARGET, session.target.code, "Convert to:")
            };
            if let Err(e) = bot
                .edit_message_text(chat_id, message_id, title)
                .parse_mode(ParseMode::Html)
                .reply_markup(make_currency_picker(prefix, selected))
                .await
            {
                warn!("Failed to show currency picker in chat {}: {}", chat_id, e);
            }
        }
        callback_data::SWAP => {
            store.update(chat_id, |s| s.swap()).await;
            show_panel(&bot, chat_id, &store).await?;
        }
        callback_data::CONVERT => {
            bot.answer_callback_query(q.id.clone()).await?;
            return trigger_conversion(bot, chat_id, store, estimator).await;
        }
        callback_data::BACK_TO_PANEL => {
            show_panel(&bot, chat_id, &store).await?;
        }
        _ => {
            if let Some(code) = data.strip_prefix(callback_data::PREFIX_SET_SOURCE) {
                match currency::find(code) {
                    Some(c) => store.update(chat_id, |s| s.select_source(c)).await,
                    None => warn!("Unknown source currency in callback: {}", code),
                }
                show_panel(&bot, chat_id, &store).await?;
            } else if let Some(code) = data.strip_prefix(callback_data::PREFIX_SET_TARGET) {
                match currency::find(code) {
                    Some(c) => store.update(chat_id, |s| s.select_target(c)).await,
                    None => warn!("Unknown target currency in callback: {}", code),
                }
                show_panel(&bot, chat_id, &store).await?;
            } else {
                warn!("Unhandled callback data '{}' in chat {}", data, chat_id);
            }
        }
    }

    bot.answer_callback_query(q.id.clone()).await?;
    Ok(())
}
