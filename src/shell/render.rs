// src/shell/render.rs
//
// Текстовое представление панели для Telegram (ParseMode::Html).
// Числа из ответа модели выводятся как есть, только форматирование.

use super::session::{ConverterSession, Phase, RequestedPair};
use crate::models::{ConversionResult, HistoricalRate};
use chrono::{Datelike, NaiveDate};
use teloxide::utils::html::escape;

pub const DISCLAIMER: &str = "Exchange rates provided by AI estimation. Not for trading purposes.";
const BAR_WIDTH: usize = 12;
/// Лимит Telegram на текст сообщения
pub const MAX_MESSAGE_CHARS: usize = 4096;
/// Строк в графике не больше месяца, берём последние точки
pub const MAX_CHART_POINTS: usize = 31;
/// Строки от модели и ввод пользователя обрезаем до этой длины
const MAX_MODEL_STRING: usize = 32;

/// Обрезка по символам
fn clip(s: &str) -> String {
    let s = s.trim();
    if s.chars().count() <= MAX_MODEL_STRING {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(MAX_MODEL_STRING - 1).collect();
        out.push('…');
        out
    }
}

/// Число с разделителями тысяч и фиксированным числом знаков
pub fn format_grouped(value: f64, decimals: usize) -> String {
    let raw = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match raw.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (raw.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let mut out = String::new();
    if value < 0.0 && raw.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(f) = frac_part {
        out.push('.');
        out.push_str(f);
    }
    out
}

/// Сумма ввода: до 3 знаков, без хвостовых нулей
pub fn format_input_amount(value: f64) -> String {
    let s = format_grouped(value, 3);
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Подпись по оси X: `M/D` для ISO-дат, иначе строка как есть
pub fn date_label(date: &str) -> String {
    match NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d") {
        Ok(d) => format!("{}/{}", d.month(), d.day()),
        Err(_) => clip(date),
    }
}

/// Блок результата. Подписи берутся из пары запроса, а не из текущего выбора.
pub fn render_result(pair: &RequestedPair, result: &ConversionResult) -> String {
    let mut text = format!(
        "{} {} =\n<b>{} {}</b>\n📈 1 {} = {:.4} {}\n",
        format_input_amount(pair.amount),
        escape(pair.source.name),
        format_grouped(result.converted_amount, 2),
        escape(&clip(&result.currency_code)),
        pair.source.code,
        result.conversion_rate,
        pair.target.code
    );
    if let Some(updated) = result.last_updated.as_deref().filter(|s| !s.trim().is_empty()) {
        text.push_str(&format!("🕒 {}\n", escape(&clip(updated))));
    }
    text
}

/// Тренд по историческому ряду. Пустой ряд -> None.
pub fn render_chart(points: &[HistoricalRate], from: &str, to: &str) -> Option<String> {
    if points.is_empty() {
        return None;
    }
    let points = &points[points.len().saturating_sub(MAX_CHART_POINTS)..];

    let min = points.iter().map(|p| p.rate).fold(f64::INFINITY, f64::min);
    let max = points.iter().map(|p| p.rate).fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    let labels: Vec<String> = points.iter().map(|p| date_label(&p.date)).collect();
    let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    let mut rows = Vec::with_capacity(points.len() + 1);
    for (label, point) in labels.iter().zip(points) {
        let filled = if span > 0.0 {
            1 + (((point.rate - min) / span) * (BAR_WIDTH - 1) as f64).round() as usize
        } else {
            BAR_WIDTH / 2
        };
        rows.push(format!(
            "{:>w$} {:.4} {}",
            label,
            point.rate,
            "█".repeat(filled.min(BAR_WIDTH)),
            w = label_width
        ));
    }
    rows.push(format!("min {:.2} · max {:.2}", min, max));

    Some(format!(
        "7-Day Exchange Rate Trend ({} to {})\n<pre>{}</pre>",
        escape(from),
        escape(to),
        escape(&rows.join("\n"))
    ))
}

/// Полная панель сессии
pub fn render_panel(session: &ConverterSession) -> String {
    let mut text = format!(
        "💱 <b>AI Currency Converter</b>\n\nAmount: <code>{}</code>\nFrom: {}\nTo: {}\n",
        escape(&clip(&session.amount)),
        escape(&session.source.to_string()),
        escape(&session.target.to_string()),
    );

    match &session.phase {
        Phase::Idle => {}
        Phase::Validating => {}
        Phase::Loading { .. } => text.push_str("\n⏳ Converting...\n"),
        Phase::Error(message) => text.push_str(&format!("\nℹ️ {}\n", escape(message))),
        Phase::Success(result) => {
            let Some(pair) = session.requested.as_ref() else {
                return text;
            };
            let head = format!("{}\n{}", text, render_result(pair, result));
            let tail = format!("\n<i>{}</i>", DISCLAIMER);

            // График не влез в сообщение: показываем результат без него
            if let Some(chart) = render_chart(&result.historical_rates, pair.source.code, pair.target.code) {
                let full = format!("{}\n{}\n{}", head, chart, tail);
                if full.chars().count() <= MAX_MESSAGE_CHARS {
                    return full;
                }
            }
            return format!("{}{}", head, tail);
        }
    }
    text
}
