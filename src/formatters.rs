use serde_json::json;

use crate::constants::UNAVAILABLE;
use crate::models::{FetchError, FetchResult, FieldValue, NormalizedRecord};

const RULE_WIDTH: usize = 44;

/// Output flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Human,
    Json,
}

/// One row of the human-readable block
#[derive(Debug, Clone)]
pub enum Line {
    /// Bare value of a field, e.g. a condition description
    Heading { field: String },
    /// `icon label: value unit`
    Field {
        icon: &'static str,
        label: &'static str,
        field: String,
        unit: &'static str,
    },
    /// Monetary value with two decimals, optionally followed by a currency field
    Price {
        icon: &'static str,
        label: &'static str,
        field: String,
        currency: Option<String>,
    },
    /// Signed delta with direction indicator and percentage
    Change { change: String, percent: String },
    Blank,
}

impl Line {
    pub fn heading(field: &str) -> Self {
        Self::Heading {
            field: field.to_string(),
        }
    }

    pub fn field(icon: &'static str, label: &'static str, field: &str, unit: &'static str) -> Self {
        Self::Field {
            icon,
            label,
            field: field.to_string(),
            unit,
        }
    }

    pub fn price(icon: &'static str, label: &'static str, field: &str, currency: Option<&str>) -> Self {
        Self::Price {
            icon,
            label,
            field: field.to_string(),
            currency: currency.map(str::to_string),
        }
    }

    pub fn change(change: &str, percent: &str) -> Self {
        Self::Change {
            change: change.to_string(),
            percent: percent.to_string(),
        }
    }
}

/// Fixed layout of the human-readable block for one source
#[derive(Debug, Clone)]
pub struct Layout {
    pub title: String,
    pub lines: Vec<Line>,
}

impl Layout {
    pub fn new(title: impl Into<String>, lines: Vec<Line>) -> Self {
        Self {
            title: title.into(),
            lines,
        }
    }
}

/// Renders a pipeline outcome; never panics, whatever the record holds
pub fn render(outcome: &FetchResult<NormalizedRecord>, layout: &Layout, style: Style) -> String {
    match (outcome, style) {
        (Ok(record), Style::Human) => format_block(record, layout),
        (Ok(record), Style::Json) => format_json(record),
        (Err(err), Style::Human) => format_failure(err),
        (Err(err), Style::Json) => format_json_error(err),
    }
}

/// Short labeled message shown in place of the data block
pub fn format_failure(err: &FetchError) -> String {
    format!("\u{274c} Error: {err}")
}

fn format_json(record: &NormalizedRecord) -> String {
    serde_json::to_string_pretty(record).unwrap_or_else(|e| {
        format_json_error(&FetchError::Compute(format!("record not serializable: {e}")))
    })
}

fn format_json_error(err: &FetchError) -> String {
    json!({ "error": err.to_string() }).to_string()
}

fn format_block(record: &NormalizedRecord, layout: &Layout) -> String {
    let heavy = "\u{2550}".repeat(RULE_WIDTH);
    let light = "\u{2500}".repeat(RULE_WIDTH);

    let mut output = format!("{heavy}\n  {}\n{light}\n", layout.title);
    for line in &layout.lines {
        output.push_str(&format_line(record, line));
        output.push('\n');
    }
    output.push_str(&heavy);
    output
}

fn format_line(record: &NormalizedRecord, line: &Line) -> String {
    match line {
        Line::Heading { field } => format!("  {}", display(record.get(field))),
        Line::Field {
            icon,
            label,
            field,
            unit,
        } => {
            let value = match record.get(field) {
                Some(value @ (FieldValue::Number(_) | FieldValue::Text(_))) => {
                    format!("{}{unit}", display(Some(value)))
                }
                _ => UNAVAILABLE.to_string(),
            };
            format!("  {icon} {label}: {value}")
        }
        Line::Price {
            icon,
            label,
            field,
            currency,
        } => {
            let amount = number(record, field).map_or_else(|| UNAVAILABLE.to_string(), |n| format!("${n:.2}"));
            let currency = currency
                .as_deref()
                .and_then(|c| match record.get(c) {
                    Some(FieldValue::Text(code)) => Some(format!(" {code}")),
                    _ => None,
                })
                .unwrap_or_default();
            format!("  {icon} {label}: {amount}{currency}")
        }
        Line::Change { change, percent } => format_change(number(record, change), number(record, percent)),
        Line::Blank => String::new(),
    }
}

/// `+$2.50 (+0.60%)` for gains, `$-1.25 (-0.30%)` for losses
fn format_change(change: Option<f64>, percent: Option<f64>) -> String {
    let Some(change) = change else {
        return format!("  \u{2796} Change: {UNAVAILABLE}");
    };

    let (indicator, sign) = if change >= 0.0 {
        ("\u{1f4c8}", "+")
    } else {
        ("\u{1f4c9}", "")
    };
    let percent = percent.map_or_else(|| UNAVAILABLE.to_string(), |p| format!("{sign}{p:.2}%"));

    format!("  {indicator} Change: {sign}${change:.2} ({percent})")
}

fn number(record: &NormalizedRecord, field: &str) -> Option<f64> {
    record.get(field).and_then(FieldValue::as_f64)
}

fn display(value: Option<&FieldValue>) -> String {
    match value {
        Some(FieldValue::Number(n)) => n.to_string(),
        Some(FieldValue::Text(s)) => s.clone(),
        Some(FieldValue::Unavailable) | None => UNAVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote_layout() -> Layout {
        Layout::new(
            "Microsoft Corporation (MSFT)",
            vec![
                Line::price("\u{1f4b0}", "Current Price", "price", Some("currency")),
                Line::change("change", "change_percent"),
                Line::price("\u{1f4cd}", "Previous Close", "previous_close", None),
                Line::field("\u{1f550}", "Market Status", "market_state", ""),
            ],
        )
    }

    fn quote_record(change: FieldValue, percent: FieldValue) -> NormalizedRecord {
        let mut record = NormalizedRecord::new();
        record.push("price", FieldValue::Number(420.5));
        record.push("previous_close", FieldValue::Number(418.0));
        record.push("change", change);
        record.push("change_percent", percent);
        record.push("currency", FieldValue::Text("USD".to_string()));
        record.push("market_state", FieldValue::Text("REGULAR".to_string()));
        record
    }

    #[test]
    fn test_positive_change_is_signed_with_up_indicator() {
        let record = quote_record(FieldValue::Number(2.5), FieldValue::Number(0.598_086));
        let text = render(&Ok(record), &quote_layout(), Style::Human);

        assert!(text.contains("\u{1f4c8} Change: +$2.50 (+0.60%)"));
        assert!(text.contains("Current Price: $420.50 USD"));
        assert!(text.contains("Previous Close: $418.00"));
        assert!(text.contains("Market Status: REGULAR"));
    }

    #[test]
    fn test_zero_change_counts_as_up() {
        assert_eq!(
            format_change(Some(0.0), Some(0.0)),
            "  \u{1f4c8} Change: +$0.00 (+0.00%)"
        );
    }

    #[test]
    fn test_negative_change_has_no_forced_sign() {
        assert_eq!(
            format_change(Some(-1.25), Some(-0.3)),
            "  \u{1f4c9} Change: $-1.25 (-0.30%)"
        );
    }

    #[test]
    fn test_missing_change_prints_placeholder() {
        let record = quote_record(FieldValue::Unavailable, FieldValue::Unavailable);
        let text = render(&Ok(record), &quote_layout(), Style::Human);
        assert!(text.contains("Change: N/A"));

        let record = quote_record(FieldValue::Text("n/a".to_string()), FieldValue::Unavailable);
        let text = render(&Ok(record), &quote_layout(), Style::Human);
        assert!(text.contains("Change: N/A"));
    }

    #[test]
    fn test_field_unit_is_dropped_when_unavailable() {
        let mut record = NormalizedRecord::new();
        record.push("temperature", FieldValue::Number(12.3));
        record.push("humidity", FieldValue::Unavailable);
        let layout = Layout::new(
            "London Weather",
            vec![
                Line::field("\u{1f321}\u{fe0f}", "Temperature", "temperature", "\u{b0}C"),
                Line::field("\u{1f4a7}", "Humidity", "humidity", "%"),
            ],
        );

        let text = render(&Ok(record), &layout, Style::Human);
        assert!(text.contains("Temperature: 12.3\u{b0}C"));
        assert!(text.contains("Humidity: N/A"));
    }

    #[test]
    fn test_json_keeps_field_order() {
        let record = quote_record(FieldValue::Number(2.5), FieldValue::Unavailable);
        let text = render(&Ok(record), &quote_layout(), Style::Json);

        let value: serde_json::Value = serde_json::from_str(&text).expect("valid JSON");
        assert_eq!(value["change_percent"], serde_json::Value::Null);

        let positions: Vec<usize> = [
            "\"price\"",
            "\"previous_close\"",
            "\"change\"",
            "\"change_percent\"",
            "\"currency\"",
            "\"market_state\"",
        ]
        .iter()
        .map(|key| text.find(key).expect("key present"))
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_failure_rendering() {
        let err: FetchResult<NormalizedRecord> = Err(FetchError::Network("HTTP 503 Service Unavailable".to_string()));

        let human = render(&err, &quote_layout(), Style::Human);
        assert_eq!(human, "\u{274c} Error: Network error: HTTP 503 Service Unavailable");

        let json = render(&err, &quote_layout(), Style::Json);
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");
        assert_eq!(value, json!({"error": "Network error: HTTP 503 Service Unavailable"}));
    }

    #[test]
    fn test_block_has_title_and_rules() {
        let record = quote_record(FieldValue::Number(2.5), FieldValue::Number(0.6));
        let text = render(&Ok(record), &quote_layout(), Style::Human);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "  Microsoft Corporation (MSFT)");
        assert!(lines[0].starts_with('\u{2550}'));
        assert!(lines[lines.len() - 1].starts_with('\u{2550}'));
    }
}
