use anyhow::Result;
use std::sync::Arc;
use teloxide::Bot;

use fxbot::estimator::Gemini;
use fxbot::shell::SessionStore;
use fxbot::{config, logger, telegram};

#[tokio::main]
async fn main() -> Result<()> {
    // 1) .env, конфиг и логгер
    dotenv::dotenv().ok();
    let cfg = config::Config::load()?;
    logger::init(&cfg);

    // 2) клиент модели создаётся явно и передаётся дальше
    let estimator = Arc::new(Gemini::from_config(&cfg)?);

    // 3) сессии пользователей
    let store = SessionStore::new(&cfg.default_source_currency, &cfg.default_target_currency);

    // 4) Telegram‑бот
    let bot = Bot::new(&cfg.telegram_token);

    // 5) запускаем диспетчер
    telegram::run(bot, estimator, store).await;
    Ok(())
}
