use async_trait::async_trait;
use fxbot::estimator::{EstimateError, Gemini, RateEstimator};
use fxbot::models::{ConversionRequest, ConversionResult, HistoricalRate};
use fxbot::shell::session::{GENERIC_FAILURE_MESSAGE, INVALID_AMOUNT_MESSAGE};
use fxbot::shell::{finish_conversion, render, start_conversion, Completion, Phase, SessionStore};
use httpmock::prelude::*;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;
use teloxide::types::ChatId;
use tokio::sync::oneshot;

const CHAT: ChatId = ChatId(42);

fn week(rate: f64) -> Vec<HistoricalRate> {
    (1..=7)
        .map(|d| HistoricalRate { date: format!("2024-05-0{}", d), rate })
        .collect()
}

fn eur_result() -> ConversionResult {
    ConversionResult {
        conversion_rate: 0.92,
        converted_amount: 0.92,
        currency_code: "EUR".into(),
        last_updated: None,
        historical_rates: week(0.92),
    }
}

/// Оценщик с заранее заданным ответом, запоминает вызовы
struct Scripted {
    reply: fn() -> Result<ConversionResult, EstimateError>,
    calls: Mutex<Vec<ConversionRequest>>,
}

impl Scripted {
    fn new(reply: fn() -> Result<ConversionResult, EstimateError>) -> Self {
        Self { reply, calls: Mutex::new(Vec::new()) }
    }

    fn calls(&self) -> Vec<ConversionRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RateEstimator for Scripted {
    async fn convert(&self, request: &ConversionRequest) -> Result<ConversionResult, EstimateError> {
        self.calls.lock().unwrap().push(request.clone());
        (self.reply)()
    }
}

/// Оценщик, ответы которого отпускает тест
struct Gated {
    gates: Mutex<VecDeque<oneshot::Receiver<Result<ConversionResult, EstimateError>>>>,
}

#[async_trait]
impl RateEstimator for Gated {
    async fn convert(&self, _request: &ConversionRequest) -> Result<ConversionResult, EstimateError> {
        let gate = self.gates.lock().unwrap().pop_front().expect("no gate prepared");
        gate.await.expect("gate dropped")
    }
}

fn store() -> SessionStore {
    SessionStore::new("USD", "EUR")
}

fn jpy_result(rate: f64, converted: f64) -> ConversionResult {
    ConversionResult {
        conversion_rate: rate,
        converted_amount: converted,
        currency_code: "JPY".into(),
        last_updated: None,
        historical_rates: week(rate),
    }
}

#[derive(Debug, PartialEq)]
enum ConvertOutcome {
    Rejected,
    Applied,
    Superseded,
}

/// Полный цикл нажатия Convert, как в обработчике кнопки, но без Telegram
async fn run_conversion<E>(store: &SessionStore, chat_id: ChatId, estimator: &E) -> ConvertOutcome
where
    E: RateEstimator + ?Sized,
{
    let Some(pending) = start_conversion(store, chat_id).await else {
        return ConvertOutcome::Rejected;
    };
    match finish_conversion(store, chat_id, estimator, pending).await {
        Completion::Applied => ConvertOutcome::Applied,
        Completion::Superseded => ConvertOutcome::Superseded,
    }
}

#[tokio::test]
async fn usd_to_eur_scenario_shows_result_and_chart() {
    let store = store();
    let estimator = Scripted::new(|| Ok(eur_result()));

    store.update(CHAT, |s| s.set_amount("1")).await;
    let outcome = run_conversion(&store, CHAT, &estimator).await;
    assert_eq!(outcome, ConvertOutcome::Applied);

    let calls = estimator.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].amount, 1.0);
    assert_eq!(calls[0].source_code, "USD");
    assert_eq!(calls[0].target_code, "EUR");

    let session = store.snapshot(CHAT).await;
    let result = session.result().expect("result shown");
    assert_eq!(result.converted_amount, 0.92);
    assert_eq!(result.conversion_rate, 0.92);

    let panel = render::render_panel(&session);
    assert!(panel.contains("0.92 EUR"));
    assert!(panel.contains("1 USD = 0.9200 EUR"));
    assert!(panel.contains(render::DISCLAIMER));

    let chart = render::render_chart(&result.historical_rates, "USD", "EUR").unwrap();
    let body = chart.split("<pre>").nth(1).unwrap();
    assert_eq!(body.lines().filter(|l| l.contains('█')).count(), 7);
}

#[tokio::test]
async fn negative_amount_makes_no_network_call() {
    let store = store();
    let estimator = Scripted::new(|| Ok(eur_result()));

    for bad in ["-5", "0", "abc", "", "1e999"] {
        store.update(CHAT, |s| s.set_amount(bad)).await;
        let outcome = run_conversion(&store, CHAT, &estimator).await;
        assert_eq!(outcome, ConvertOutcome::Rejected, "amount {bad:?}");
        assert_eq!(store.snapshot(CHAT).await.phase, Phase::Error(INVALID_AMOUNT_MESSAGE.into()));
    }
    assert!(estimator.calls().is_empty());
}

#[tokio::test]
async fn transport_failure_shows_generic_message() {
    let store = store();
    let estimator = Scripted::new(|| {
        Err(EstimateError::Upstream { status: 503, message: "unavailable".into() })
    });

    let outcome = run_conversion(&store, CHAT, &estimator).await;
    assert_eq!(outcome, ConvertOutcome::Applied);

    let session = store.snapshot(CHAT).await;
    assert!(!session.is_loading());
    assert_eq!(session.phase, Phase::Error(GENERIC_FAILURE_MESSAGE.into()));
    assert!(render::render_panel(&session).contains(GENERIC_FAILURE_MESSAGE));
}

#[tokio::test]
async fn loading_is_visible_while_request_is_in_flight() {
    let store = store();
    let (tx, rx) = oneshot::channel();
    let estimator = Gated { gates: Mutex::new(VecDeque::from([rx])) };

    let pending = start_conversion(&store, CHAT).await.unwrap();
    assert!(store.snapshot(CHAT).await.is_loading());
    assert!(render::render_panel(&store.snapshot(CHAT).await).contains("Converting"));

    tx.send(Ok(eur_result())).unwrap();
    let completion = finish_conversion(&store, CHAT, &estimator, pending).await;
    assert_eq!(completion, Completion::Applied);
    assert!(store.snapshot(CHAT).await.result().is_some());
}

#[tokio::test]
async fn only_latest_request_updates_display() {
    let store = store();
    let (tx_first, rx_first) = oneshot::channel();
    let (tx_second, rx_second) = oneshot::channel();
    let estimator = Gated { gates: Mutex::new(VecDeque::from([rx_first, rx_second])) };

    let first = start_conversion(&store, CHAT).await.unwrap();
    store.update(CHAT, |s| s.set_amount("2")).await;
    let second = start_conversion(&store, CHAT).await.unwrap();

    let first_task = finish_conversion(&store, CHAT, &estimator, first);
    let second_task = finish_conversion(&store, CHAT, &estimator, second);

    let mut newer = eur_result();
    newer.converted_amount = 1.84;
    tx_second.send(Ok(newer)).unwrap();
    let mut older = eur_result();
    older.converted_amount = 999.0;
    tx_first.send(Ok(older)).unwrap();

    let (first_done, second_done) = tokio::join!(first_task, second_task);
    assert_eq!(first_done, Completion::Superseded);
    assert_eq!(second_done, Completion::Applied);
    assert_eq!(store.snapshot(CHAT).await.result().unwrap().converted_amount, 1.84);
}

#[tokio::test]
async fn swap_clears_shown_result() {
    let store = store();
    let estimator = Scripted::new(|| Ok(eur_result()));
    run_conversion(&store, CHAT, &estimator).await;
    assert!(store.snapshot(CHAT).await.result().is_some());

    store.update(CHAT, |s| s.swap()).await;
    let session = store.snapshot(CHAT).await;
    assert!(session.result().is_none());
    assert_eq!(session.source.code, "EUR");
    assert_eq!(session.target.code, "USD");
}

#[tokio::test]
async fn swap_during_loading_discards_reply_for_old_pair() {
    let store = store();
    let (tx, rx) = oneshot::channel();
    let estimator = Gated { gates: Mutex::new(VecDeque::from([rx])) };

    store.update(CHAT, |s| s.set_amount("1000")).await;
    let pending = start_conversion(&store, CHAT).await.unwrap();
    store.update(CHAT, |s| s.swap()).await;

    tx.send(Ok(eur_result())).unwrap();
    let completion = finish_conversion(&store, CHAT, &estimator, pending).await;
    assert_eq!(completion, Completion::Superseded);

    let session = store.snapshot(CHAT).await;
    assert_eq!(session.phase, Phase::Idle);
    assert!(session.result().is_none());
    let panel = render::render_panel(&session);
    assert!(!panel.contains("1 USD = 0.9200 EUR"));
    assert!(!panel.contains("1 EUR = 0.9200 USD"));
}

#[tokio::test]
async fn restart_while_in_flight_keeps_newer_request() {
    let store = store();
    let (tx_old, rx_old) = oneshot::channel();
    let (tx_new, rx_new) = oneshot::channel();
    let estimator = Gated { gates: Mutex::new(VecDeque::from([rx_old, rx_new])) };

    store.update(CHAT, |s| s.set_amount("1000")).await;
    let before_reset = start_conversion(&store, CHAT).await.unwrap();

    store.reset(CHAT).await;
    store
        .update(CHAT, |s| {
            s.set_amount("5");
            s.select_target(fxbot::currency::find("JPY").unwrap());
        })
        .await;
    let after_reset = start_conversion(&store, CHAT).await.unwrap();
    assert_ne!(before_reset.seq, after_reset.seq);

    let old_task = finish_conversion(&store, CHAT, &estimator, before_reset);
    let new_task = finish_conversion(&store, CHAT, &estimator, after_reset);

    tx_new.send(Ok(jpy_result(150.0, 750.0))).unwrap();
    let mut stale = eur_result();
    stale.converted_amount = 920.0;
    tx_old.send(Ok(stale)).unwrap();

    let (old_done, new_done) = tokio::join!(old_task, new_task);
    assert_eq!(old_done, Completion::Superseded);
    assert_eq!(new_done, Completion::Applied);

    let session = store.snapshot(CHAT).await;
    assert_eq!(session.result().unwrap().converted_amount, 750.0);
    let panel = render::render_panel(&session);
    assert!(panel.contains("5 US Dollar ="));
    assert!(panel.contains("750.00 JPY"));
    assert!(panel.contains("1 USD = 150.0000 JPY"));
    assert!(!panel.contains("920.00"));
}

#[tokio::test]
async fn result_keeps_labels_of_requested_pair() {
    let store = store();
    let estimator = Scripted::new(|| Ok(eur_result()));
    run_conversion(&store, CHAT, &estimator).await;

    store
        .update(CHAT, |s| {
            s.set_amount("250");
            s.select_target(fxbot::currency::find("JPY").unwrap());
        })
        .await;
    let panel = render::render_panel(&store.snapshot(CHAT).await);
    assert!(panel.contains("1 US Dollar ="));
    assert!(panel.contains("1 USD = 0.9200 EUR"));
    assert!(!panel.contains("1 USD = 0.9200 JPY"));
}

#[tokio::test]
async fn sessions_are_independent_per_chat() {
    let store = store();
    let estimator = Scripted::new(|| Ok(eur_result()));
    run_conversion(&store, CHAT, &estimator).await;

    let other = store.snapshot(ChatId(7)).await;
    assert_eq!(other.phase, Phase::Idle);
    assert_eq!(other.amount, "1");
}

#[tokio::test]
async fn non_json_reply_from_gemini_reaches_error_state() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1beta/models/gemini-2.5-flash:generateContent");
            then.status(200).json_body(json!({
                "candidates": [{ "content": { "parts": [{ "text": "I think about 0.92" }] } }]
            }));
        })
        .await;
    let gemini = Gemini::new("key", "gemini-2.5-flash", &server.base_url(), None).unwrap();

    let store = store();
    let outcome = run_conversion(&store, CHAT, &gemini).await;
    assert_eq!(outcome, ConvertOutcome::Applied);
    assert_eq!(store.snapshot(CHAT).await.phase, Phase::Error(GENERIC_FAILURE_MESSAGE.into()));
}

#[tokio::test]
async fn gemini_reply_is_displayed_verbatim() {
    let server = MockServer::start_async().await;
    let text = json!({
        "conversionRate": 150.1234567,
        "convertedAmount": 15012.3456,
        "currencyCode": "JPY",
        "lastUpdated": "2024-05-07",
        "historicalRates": week(150.0)
    })
    .to_string();
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1beta/models/gemini-2.5-flash:generateContent");
            then.status(200).json_body(json!({
                "candidates": [{ "content": { "parts": [{ "text": text }] } }]
            }));
        })
        .await;
    let gemini = Gemini::new("key", "gemini-2.5-flash", &server.base_url(), None).unwrap();

    let store = store();
    store
        .update(CHAT, |s| {
            s.set_amount("100");
            s.select_target(fxbot::currency::find("JPY").unwrap());
        })
        .await;
    run_conversion(&store, CHAT, &gemini).await;

    let session = store.snapshot(CHAT).await;
    let result = session.result().unwrap();
    assert_eq!(result.conversion_rate, 150.1234567);
    assert_eq!(result.converted_amount, 15012.3456);

    let panel = render::render_panel(&session);
    assert!(panel.contains("100 US Dollar ="));
    assert!(panel.contains("15,012.35 JPY"));
    assert!(panel.contains("1 USD = 150.1235 JPY"));
    assert!(panel.contains("2024-05-07"));
}
