// src/notifier/conversion.rs

use super::ui::show_panel;
use crate::estimator::RateEstimator;
use crate::shell::{finish_conversion, start_conversion, Completion, SessionStore};
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::warn;

/// Нажатие "Convert": проверка суммы, спиннер на панели, вызов модели в отдельной задаче.
/// Панель после ответа перерисовывается только если ответ не устарел.
pub async fn trigger_conversion<E>(
    bot: Bot,
    chat_id: ChatId,
    store: SessionStore,
    estimator: Arc<E>,
) -> anyhow::Result<()>
where
    E: RateEstimator + ?Sized + 'static,
{
    let pending = start_conversion(&store, chat_id).await;

    // Loading или ошибка ввода
    show_panel(&bot, chat_id, &store).await?;

    let Some(pending) = pending else {
        return Ok(());
    };

    tokio::spawn(async move {
        let completion = finish_conversion(&store, chat_id, estimator.as_ref(), pending).await;
        if completion == Completion::Applied {
            if let Err(e) = show_panel(&bot, chat_id, &store).await {
                warn!("Failed to render conversion result in chat {}: {}", chat_id, e);
            }
        }
    });

    Ok(())
}
