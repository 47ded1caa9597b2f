// src/estimator/error.rs

/// Ошибки оценщика: транспорт отдельно, невалидный ответ отдельно
#[derive(Debug, thiserror::Error)]
pub enum EstimateError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upstream returned HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("no text payload in upstream response")]
    EmptyResponse,

    #[error("response is not valid JSON: {0}")]
    NotJson(String),

    #[error("response does not match schema at `{path}`: {reason}")]
    Schema { path: String, reason: String },
}

impl EstimateError {
    /// Сбой сети/апстрима (в отличие от кривого ответа модели)
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            EstimateError::Request(_) | EstimateError::Upstream { .. } | EstimateError::EmptyResponse
        )
    }
}
