//! Yahoo Finance chart quote.
//!
//! The chart endpoint is unofficial and its shape may change without notice;
//! required paths that disappear surface as `MissingField` failures.

use std::time::Duration;

use crate::config::QuoteConfig;
use crate::formatters::{Layout, Line};
use crate::models::{ResponseShape, SourceDescriptor};
use crate::normalize::{Extract, FieldSpec};
use crate::pipeline::Source;

const META: &str = "chart.result[0].meta";

/// Latest quote for a ticker symbol
pub fn quote(config: &QuoteConfig, base_url: &str, timeout: Duration) -> Source {
    let descriptor = SourceDescriptor::new(base_url, ResponseShape::Json)
        .with_path_segment(config.symbol.as_str())
        .with_param("interval", "1d")
        .with_param("range", "1d")
        .with_timeout(timeout);

    let price = format!("{META}.regularMarketPrice");
    let previous_close = format!("{META}.previousClose");
    let chart_previous_close = format!("{META}.chartPreviousClose");
    let currency = format!("{META}.currency");
    let market_state = format!("{META}.marketState");

    let fields = vec![
        FieldSpec::required("price", Extract::path(&price)),
        FieldSpec::required(
            "previous_close",
            Extract::first_of([previous_close.as_str(), chart_previous_close.as_str()]),
        ),
        FieldSpec::optional("change", Extract::difference("price", "previous_close")),
        FieldSpec::optional("change_percent", Extract::percent_change("change", "previous_close")),
        FieldSpec::optional("currency", Extract::path(&currency)),
        FieldSpec::optional("market_state", Extract::path(&market_state)),
    ];

    let layout = Layout::new(
        format!("\u{1f4ca} {} ({})", config.company, config.symbol),
        vec![
            Line::price("\u{1f4b0}", "Current Price", "price", Some("currency")),
            Line::change("change", "change_percent"),
            Line::price("\u{1f4cd}", "Previous Close", "previous_close", None),
            Line::field("\u{1f550}", "Market Status", "market_state", ""),
        ],
    );

    Source {
        name: format!("yahoo:{}", config.symbol),
        descriptor,
        fields,
        layout,
    }
}
