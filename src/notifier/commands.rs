// src/notifier/commands.rs

use super::conversion::trigger_conversion;
use super::ui::{send_new_panel, show_panel};
use super::{Command, ConvertArgs};
use crate::currency::{self, CurrencyDescriptor, CURRENCIES};
use crate::estimator::RateEstimator;
use crate::shell::SessionStore;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::info;

// Основной обработчик команд
pub async fn handle_command<E>(
    bot: Bot,
    msg: Message,
    cmd: Command,
    store: SessionStore,
    estimator: Arc<E>,
) -> anyhow::Result<()>
where
    E: RateEstimator + ?Sized + 'static,
{
    let chat_id = msg.chat.id;
    info!("Command {:?} from chat {}", cmd, chat_id);

    match cmd {
        Command::Start => {
            store.reset(chat_id).await;
            send_new_panel(&bot, chat_id, &store).await?;
        }
        Command::Help => {
            bot.send_message(chat_id, Command::descriptions().to_string()).await?;
        }
        Command::Currencies => {
            let text = CURRENCIES
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join("\n");
            bot.send_message(chat_id, format!("Supported currencies:\n{}", text)).await?;
        }
        Command::Swap => {
            store.update(chat_id, |s| s.swap()).await;
            show_panel(&bot, chat_id, &store).await?;
        }
        Command::Convert(arg) => {
            let args = ConvertArgs::parse(&arg);

            // Коды проверяем до изменения сессии
            let (source, target) = match (resolve(args.source.as_deref()), resolve(args.target.as_deref())) {
                (Ok(source), Ok(target)) => (source, target),
                (Err(code), _) | (_, Err(code)) => {
                    bot.send_message(chat_id, format!("❌ Unknown currency: {}. See /currencies", code)).await?;
                    return Ok(());
                }
            };

            store
                .update(chat_id, |s| {
                    if let Some(amount) = args.amount.as_deref() {
                        s.set_amount(amount);
                    }
                    if let Some(c) = source {
                        s.select_source(c);
                    }
                    if let Some(c) = target {
                        s.select_target(c);
                    }
                    // Новая панель под командой
                    s.panel_message_id = None;
                })
                .await;

            trigger_conversion(bot, chat_id, store, estimator).await?;
        }
    }

    Ok(())
}

/// Код из аргумента -> валюта каталога. Неизвестный код возвращается как ошибка.
fn resolve(code: Option<&str>) -> Result<Option<&'static CurrencyDescriptor>, String> {
    match code {
        None => Ok(None),
        Some(code) => currency::find(code).map(Some).ok_or_else(|| code.to_uppercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::resolve;

    #[test]
    fn resolve_codes() {
        assert_eq!(resolve(None), Ok(None));
        assert_eq!(resolve(Some("jpy")).unwrap().map(|c| c.code), Some("JPY"));
        assert_eq!(resolve(Some("zzz")), Err("ZZZ".to_string()));
    }
}
