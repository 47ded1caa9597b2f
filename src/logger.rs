// src/logger.rs

use crate::config::Config;
use tracing_subscriber::fmt;
use tracing_subscriber::filter::EnvFilter;

/// Инициализация логирования через tracing
pub fn init(cfg: &Config) {
    // Уровень из RUST_LOG, иначе INFO
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // ключ не логируем, только факт его наличия
    tracing::info!(
        "Logger initialized. Model = {}, api key set = {}",
        cfg.gemini_model,
        !cfg.gemini_api_key.is_empty()
    );
}
