// src/telegram.rs

use crate::estimator::RateEstimator;
use crate::notifier::{Command, handle_callback, handle_command, handle_message};
use crate::shell::SessionStore;
use std::sync::Arc;
use teloxide::{
    prelude::*,
    dptree,
    types::{CallbackQuery, Message},
};

pub async fn run<E>(bot: Bot, estimator: Arc<E>, store: SessionStore)
where
    E: RateEstimator + ?Sized + 'static,
{
    // 1) Текстовые команды
    let commands_branch = Update::filter_message()
        .filter_command::<Command>()
        .endpoint({
            let estimator = estimator.clone();
            let store = store.clone();
            move |bot: Bot, msg: Message, cmd: Command| {
                let estimator = estimator.clone();
                let store = store.clone();
                async move {
                    if let Err(err) = handle_command(bot, msg, cmd, store, estimator).await {
                        tracing::error!("command handler error: {:?}", err);
                    }
                    respond(())
                }
            }
        });

    // 2) Inline‑callbacks
    let callback_branch = Update::filter_callback_query()
        .endpoint({
            let estimator = estimator.clone();
            let store = store.clone();
            move |bot: Bot, q: CallbackQuery| {
                let estimator = estimator.clone();
                let store = store.clone();
                async move {
                    if let Err(err) = handle_callback(bot, q, store, estimator).await {
                        tracing::error!("callback handler error: {:?}", err);
                    }
                    respond(())
                }
            }
        });

    // 3) Текстовые сообщения (сумма)
    let message_branch = Update::filter_message()
        .endpoint({
            let store = store.clone();
            move |bot: Bot, msg: Message| {
                let store = store.clone();
                async move {
                    if let Err(err) = handle_message(bot, msg, store).await {
                        tracing::error!("message handler error: {:?}", err);
                    }
                    respond(())
                }
            }
        });

    // Собираем все ветки в Dispatcher
    Dispatcher::builder(bot, dptree::entry()
        .branch(commands_branch)
        .branch(callback_branch)
        .branch(message_branch))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
