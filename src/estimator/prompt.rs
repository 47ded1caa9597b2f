// src/estimator/prompt.rs

use crate::models::ConversionRequest;
use serde_json::{json, Value};

/// Текст запроса к модели
pub fn build_prompt(request: &ConversionRequest) -> String {
    format!(
        "Convert {} {} to {}.\n\
         Provide the current estimated market exchange rate, the total converted amount, \
         and a simulated list of the exchange rate for the past 7 days (including today) \
         to visualize the trend.\n\
         Ensure the dates are in 'YYYY-MM-DD' format.",
        request.amount, request.source_code, request.target_code
    )
}

/// Схема ответа в формате Gemini (`responseSchema`)
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "conversionRate": {
                "type": "NUMBER",
                "description": "The exchange rate used for conversion (1 unit of source to target)."
            },
            "convertedAmount": {
                "type": "NUMBER",
                "description": "The total amount in the target currency."
            },
            "currencyCode": {
                "type": "STRING",
                "description": "The 3-letter code of the target currency."
            },
            "lastUpdated": {
                "type": "STRING",
                "description": "The date of the conversion rate."
            },
            "historicalRates": {
                "type": "ARRAY",
                "description": "Past 7 days of exchange rates for 1 unit of source currency.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "date": { "type": "STRING" },
                        "rate": { "type": "NUMBER" }
                    },
                    "required": ["date", "rate"]
                }
            }
        },
        "required": ["conversionRate", "convertedAmount", "currencyCode", "historicalRates"]
    })
}

/// Тело `generateContent`
pub fn request_body(request: &ConversionRequest) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": build_prompt(request) }]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema()
        }
    })
}
