// src/models.rs
use serde::{Deserialize, Serialize};

/// Запрос на конвертацию (живёт только на время одного вызова)
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub amount: f64,
    pub source_code: String,
    pub target_code: String,
}

/// Точка исторического ряда
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRate {
    pub date: String,
    pub rate: f64,
}

/// Результат оценки, как его вернула модель.
/// Длина `historical_rates` и равенство `converted_amount == amount * conversion_rate`
/// не проверяются.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub conversion_rate: f64,
    pub converted_amount: f64,
    pub currency_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    pub historical_rates: Vec<HistoricalRate>,
}
