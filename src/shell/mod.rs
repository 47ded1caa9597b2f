// src/shell/mod.rs

pub mod render;
pub mod session;

pub use session::{Completion, ConverterSession, PendingConversion, Phase};

use crate::currency::CurrencyDescriptor;
use crate::estimator::RateEstimator;
use std::collections::HashMap;
use std::sync::Arc;
use teloxide::types::ChatId;
use tokio::sync::RwLock;
use tracing::info;

/// Сессии пользователей по чатам
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<ChatId, ConverterSession>>>,
    default_source: &'static CurrencyDescriptor,
    default_target: &'static CurrencyDescriptor,
}

impl SessionStore {
    pub fn new(default_source: &str, default_target: &str) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            default_source: crate::currency::find_or_default(default_source),
            default_target: crate::currency::find_or_default(default_target),
        }
    }

    fn fresh(&self) -> ConverterSession {
        ConverterSession::new(self.default_source.code, self.default_target.code)
    }

    /// Изменение сессии под блокировкой (без await внутри)
    pub async fn update<R>(&self, chat_id: ChatId, f: impl FnOnce(&mut ConverterSession) -> R) -> R {
        let mut guard = self.inner.write().await;
        let session = guard.entry(chat_id).or_insert_with(|| self.fresh());
        f(session)
    }

    /// Копия текущей сессии для отрисовки
    pub async fn snapshot(&self, chat_id: ChatId) -> ConverterSession {
        let guard = self.inner.read().await;
        guard.get(&chat_id).cloned().unwrap_or_else(|| self.fresh())
    }

    /// Сессия заново, но с продолжением нумерации запросов:
    /// ответ на запрос, выданный до сброса, не применится
    pub async fn reset(&self, chat_id: ChatId) -> ConverterSession {
        let mut session = self.fresh();
        let mut guard = self.inner.write().await;
        if let Some(previous) = guard.get(&chat_id) {
            session.continue_sequence_from(previous);
        }
        guard.insert(chat_id, session.clone());
        drop(guard);
        info!("Session for {} reset", chat_id);
        session
    }
}

/// Шаг 1: проверка суммы и переход в Loading
pub async fn start_conversion(store: &SessionStore, chat_id: ChatId) -> Option<PendingConversion> {
    let pending = store.update(chat_id, |s| s.begin_convert()).await;
    match &pending {
        Some(p) => info!(
            "Chat {}: conversion #{} {} {} -> {} started",
            chat_id, p.seq, p.request.amount, p.request.source_code, p.request.target_code
        ),
        None => info!("Chat {}: invalid amount, no request issued", chat_id),
    }
    pending
}

/// Шаг 2: вызов оценщика (блокировка не держится) и применение ответа
pub async fn finish_conversion<E>(
    store: &SessionStore,
    chat_id: ChatId,
    estimator: &E,
    pending: PendingConversion,
) -> Completion
where
    E: RateEstimator + ?Sized,
{
    let outcome = estimator.convert(&pending.request).await;
    let completion = store.update(chat_id, |s| s.complete(pending.seq, outcome)).await;
    if completion == Completion::Superseded {
        info!("Chat {}: response for conversion #{} discarded as stale", chat_id, pending.seq);
    }
    completion
}
