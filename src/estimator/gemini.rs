// src/estimator/gemini.rs

use super::{prompt, validate, EstimateError, RateEstimator};
use crate::config::Config;
use crate::models::{ConversionRequest, ConversionResult};
use anyhow::{anyhow, Result};
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, error, warn};

/// Ответ `generateContent` (нужна только часть полей)
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize, Debug)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize, Debug)]
struct Part {
    text: Option<String>,
}

/// Обёртка ошибки Google API
#[derive(Deserialize, Debug)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize, Debug)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl GenerateResponse {
    /// Склеиваем текстовые части первого кандидата
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.trim().is_empty() { None } else { Some(text) }
    }
}

/// Клиент Gemini
#[derive(Debug, Clone)]
pub struct Gemini {
    api_key:  String,
    model:    String,
    client:   Client,
    base_url: Url,
}

impl Gemini {
    /// `base_url` с завершающим `/`
    pub fn new(api_key: &str, model: &str, base_url: &str, timeout: Option<std::time::Duration>) -> Result<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| anyhow!("Invalid Gemini URL `{}`: {}", base_url, e))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder
            .build()
            .map_err(|e| anyhow!("HTTP client build error: {}", e))?;

        Ok(Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
            base_url,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(&cfg.gemini_api_key, &cfg.gemini_model, &cfg.gemini_base_url, cfg.request_timeout())
    }

    fn endpoint(&self) -> Result<Url, EstimateError> {
        let path = format!("v1beta/models/{}:generateContent", self.model);
        self.base_url.join(&path).map_err(|e| EstimateError::Upstream {
            status: 0,
            message: format!("bad endpoint `{}`: {}", path, e),
        })
    }

    /// Один вызов модели, возвращает сырой текст ответа
    async fn generate(&self, request: &ConversionRequest) -> Result<String, EstimateError> {
        let url = self.endpoint()?;
        debug!("POST {} ({} {} -> {})", url.path(), request.amount, request.source_code, request.target_code);

        let resp = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&prompt::request_body(request))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(EstimateError::Upstream { status: status.as_u16(), message });
        }

        let api: GenerateResponse = resp.json().await?;
        api.text().ok_or(EstimateError::EmptyResponse)
    }
}

#[async_trait::async_trait]
impl RateEstimator for Gemini {
    async fn convert(&self, request: &ConversionRequest) -> Result<ConversionResult, EstimateError> {
        let text = self.generate(request).await.map_err(|e| {
            error!("Gemini call failed for {} -> {}: {}", request.source_code, request.target_code, e);
            e
        })?;

        validate::parse_result(&text).map_err(|e| {
            warn!("Gemini response rejected for {} -> {}: {}", request.source_code, request.target_code, e);
            e
        })
    }
}
