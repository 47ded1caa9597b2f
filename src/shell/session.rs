// src/shell/session.rs

use crate::currency::{self, CurrencyDescriptor};
use crate::models::{ConversionRequest, ConversionResult};

pub const INVALID_AMOUNT_MESSAGE: &str = "Please enter a valid amount.";
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to fetch conversion rates. Please try again.";

/// Фаза сессии конвертера
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    Validating,
    Loading { seq: u64 },
    Success(ConversionResult),
    Error(String),
}

/// Токен выданного запроса: результат применится, только если `seq` всё ещё последний
#[derive(Debug, Clone, PartialEq)]
pub struct PendingConversion {
    pub seq: u64,
    pub request: ConversionRequest,
}

/// Что произошло с пришедшим ответом
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Superseded,
}

/// Сумма и пара, с которыми выдан запрос; результат подписывается ими,
/// а не текущим выбором в панели
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestedPair {
    pub amount: f64,
    pub source: &'static CurrencyDescriptor,
    pub target: &'static CurrencyDescriptor,
}

/// Состояние одного пользователя (чата)
#[derive(Debug, Clone)]
pub struct ConverterSession {
    pub amount: String,
    pub source: &'static CurrencyDescriptor,
    pub target: &'static CurrencyDescriptor,
    pub phase: Phase,
    /// Параметры последнего выданного запроса
    pub requested: Option<RequestedPair>,
    /// Ждём ввода суммы текстом
    pub awaiting_amount: bool,
    /// Сообщение-панель бота, которое редактируем
    pub panel_message_id: Option<i32>,
    last_seq: u64,
}

impl Default for ConverterSession {
    fn default() -> Self {
        Self::new(currency::DEFAULT_SOURCE, currency::DEFAULT_TARGET)
    }
}

impl ConverterSession {
    pub fn new(source_code: &str, target_code: &str) -> Self {
        Self {
            amount: "1".to_string(),
            source: currency::find_or_default(source_code),
            target: currency::find_or_default(target_code),
            phase: Phase::Idle,
            requested: None,
            awaiting_amount: false,
            panel_message_id: None,
            last_seq: 0,
        }
    }

    pub fn set_amount(&mut self, text: &str) {
        self.amount = text.trim().to_string();
        self.awaiting_amount = false;
    }

    pub fn select_source(&mut self, currency: &'static CurrencyDescriptor) {
        self.source = currency;
    }

    pub fn select_target(&mut self, currency: &'static CurrencyDescriptor) {
        self.target = currency;
    }

    /// Меняем валюты местами. Показанный результат и запрос в полёте
    /// относятся к старой паре: результат убираем, запрос отменяем.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.source, &mut self.target);
        if matches!(self.phase, Phase::Success(_) | Phase::Loading { .. }) {
            self.cancel_pending();
            self.phase = Phase::Idle;
            self.requested = None;
        }
    }

    /// Ответ на уже выданный запрос больше не применится
    pub fn cancel_pending(&mut self) {
        self.last_seq += 1;
    }

    /// Новая сессия после /start продолжает нумерацию запросов старой,
    /// иначе ответ на запрос до сброса совпадёт по `seq` с новым
    pub fn continue_sequence_from(&mut self, previous: &ConverterSession) {
        self.last_seq = self.last_seq.max(previous.last_seq + 1);
    }

    pub fn result(&self) -> Option<&ConversionResult> {
        match &self.phase {
            Phase::Success(r) => Some(r),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading { .. })
    }

    /// Проверка суммы и выдача токена запроса.
    /// При невалидной сумме запрос не создаётся, фаза -> Error.
    pub fn begin_convert(&mut self) -> Option<PendingConversion> {
        self.phase = Phase::Validating;
        self.awaiting_amount = false;

        let amount = match parse_amount(&self.amount) {
            Some(a) => a,
            None => {
                self.phase = Phase::Error(INVALID_AMOUNT_MESSAGE.to_string());
                return None;
            }
        };

        self.last_seq += 1;
        let seq = self.last_seq;
        self.phase = Phase::Loading { seq };
        self.requested = Some(RequestedPair {
            amount,
            source: self.source,
            target: self.target,
        });

        Some(PendingConversion {
            seq,
            request: ConversionRequest {
                amount,
                source_code: self.source.code.to_string(),
                target_code: self.target.code.to_string(),
            },
        })
    }

    /// Применение ответа. Устаревшие ответы (не последний `seq`) отбрасываются.
    pub fn complete<E>(&mut self, seq: u64, outcome: Result<ConversionResult, E>) -> Completion {
        if seq != self.last_seq || !self.is_loading() {
            return Completion::Superseded;
        }
        self.phase = match outcome {
            Ok(result) => Phase::Success(result),
            Err(_) => {
                self.requested = None;
                Phase::Error(GENERIC_FAILURE_MESSAGE.to_string())
            }
        };
        Completion::Applied
    }
}

/// Сумма должна быть конечным положительным числом
pub fn parse_amount(text: &str) -> Option<f64> {
    let text = text.trim().replace(',', ".");
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Some(v),
        _ => None,
    }
}
