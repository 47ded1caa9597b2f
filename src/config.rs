// src/config.rs
use serde::Deserialize;
use std::env;
use std::time::Duration;
use anyhow::{anyhow, Result};
use config::{Config as Loader, Environment, File};

use crate::currency;

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    // Telegram
    pub telegram_token: String,

    // Gemini
    #[serde(default)]
    pub gemini_api_key: String, // Пустой ключ: каждый запрос упадёт на транспорте
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>, // None = без таймаута на клиенте

    // Валюты по умолчанию для новой сессии
    #[serde(default = "default_source_currency")]
    pub default_source_currency: String,
    #[serde(default = "default_target_currency")]
    pub default_target_currency: String,
}

// --- Значения по умолчанию ---
fn default_gemini_model() -> String { "gemini-2.5-flash".into() }
fn default_gemini_base_url() -> String { "https://generativelanguage.googleapis.com/".into() }
fn default_source_currency() -> String { currency::DEFAULT_SOURCE.into() }
fn default_target_currency() -> String { currency::DEFAULT_TARGET.into() }

impl Config {
    pub fn load() -> Result<Self> {
        let file = env::var("FXBOT_CONFIG").unwrap_or_else(|_| "Config.toml".into());
        let loader = Loader::builder()
            .add_source(File::with_name(&file).required(false))
            .add_source(Environment::with_prefix("FXBOT").separator("__"))
            .build()?;
        let cfg: Config = loader.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Проверка значений, которые serde проверить не может
    pub fn validate(&self) -> Result<()> {
        for code in [&self.default_source_currency, &self.default_target_currency] {
            if currency::find(code).is_none() {
                return Err(anyhow!("Unknown default currency `{}` in config", code));
            }
        }
        if self.gemini_model.trim().is_empty() {
            return Err(anyhow!("gemini_model must not be empty"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
