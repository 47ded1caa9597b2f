// src/estimator/validate.rs

use super::EstimateError;
use crate::models::ConversionResult;
use serde_json::Value;

/// Разбор текста модели в `ConversionResult` со сверкой формы.
/// Апстриму не доверяем: схема в запросе это пожелание, а не гарантия.
pub fn parse_result(text: &str) -> Result<ConversionResult, EstimateError> {
    let value: Value = serde_json::from_str(text.trim())
        .map_err(|e| EstimateError::NotJson(e.to_string()))?;

    if !value.is_object() {
        return Err(EstimateError::Schema {
            path: ".".into(),
            reason: "expected a JSON object".into(),
        });
    }

    let result: ConversionResult = serde_path_to_error::deserialize(value).map_err(|e| {
        EstimateError::Schema {
            path: e.path().to_string(),
            reason: e.inner().to_string(),
        }
    })?;

    check_shape(&result)?;
    Ok(result)
}

fn check_shape(result: &ConversionResult) -> Result<(), EstimateError> {
    if result.currency_code.trim().is_empty() {
        return Err(EstimateError::Schema {
            path: "currencyCode".into(),
            reason: "empty currency code".into(),
        });
    }
    for (i, point) in result.historical_rates.iter().enumerate() {
        if point.date.trim().is_empty() {
            return Err(EstimateError::Schema {
                path: format!("historicalRates[{}].date", i),
                reason: "empty date".into(),
            });
        }
    }
    Ok(())
}
