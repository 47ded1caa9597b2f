// src/estimator/mod.rs

pub mod error;
pub mod gemini;
pub mod prompt;
pub mod validate;

pub use error::EstimateError;
pub use gemini::Gemini;

use async_trait::async_trait;
use crate::models::{ConversionRequest, ConversionResult};

/// Источник оценки курса. Один вызов = один сетевой запрос, без ретраев и кэша.
/// Сумму проверяет вызывающая сторона.
#[async_trait]
pub trait RateEstimator: Send + Sync {
    async fn convert(&self, request: &ConversionRequest) -> Result<ConversionResult, EstimateError>;
}
