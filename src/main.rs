use std::io::Write;

use anyhow::Result;
use chrono::Local;
use fetch_render::formatters::format_failure;
use fetch_render::models::Payload;
use fetch_render::sources::{open_meteo, wttr, yahoo};
use fetch_render::{AppConfig, DataFetchPipeline, Style, Transport};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const WIDTH: usize = 60;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fetch_render=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::from_env();
    tracing::info!(timeout_secs = config.timeout_secs, symbol = %config.quote.symbol, "Starting run");

    let pipeline = DataFetchPipeline::new(Transport::new()?);
    let timeout = config.timeout();
    let endpoints = &config.endpoints;

    let mut out = std::io::stdout().lock();
    let heavy = "=".repeat(WIDTH);
    let light = "-".repeat(WIDTH);

    writeln!(out, "{heavy}")?;
    writeln!(
        out,
        "{} Weather & {} Stock - {}",
        config.location.name,
        config.quote.symbol,
        Local::now().format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(out, "{heavy}")?;

    let weather = pipeline
        .run(&open_meteo::current_conditions(&config.location, &endpoints.open_meteo, timeout))
        .await;
    writeln!(out, "\n{}", weather.render(Style::Human))?;

    let now = pipeline
        .run(&wttr::conditions(&config.location, &endpoints.wttr, timeout))
        .await;
    writeln!(out, "\n{}", now.render(Style::Human))?;

    let quote = pipeline
        .run(&yahoo::quote(&config.quote, &endpoints.yahoo_chart, timeout))
        .await;
    writeln!(out, "\n{}", quote.render(Style::Human))?;

    writeln!(out, "\n{heavy}\nJSON Output:\n{light}")?;
    writeln!(out, "{}", weather.render(Style::Json))?;
    writeln!(out, "{}", quote.render(Style::Json))?;

    writeln!(out, "\n{heavy}\nFull Forecast:\n{heavy}")?;
    match pipeline
        .fetch_payload(&wttr::forecast(&config.location, &endpoints.wttr, timeout))
        .await
    {
        Ok(Payload::Text(text)) => writeln!(out, "{}", text.trim_end()),
        Ok(Payload::Json(value)) => writeln!(out, "{value:#}"),
        Err(err) => writeln!(out, "{}", format_failure(&err)),
    }?;

    writeln!(out, "\n{heavy}")?;
    writeln!(out, "Data retrieved at: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out, "{heavy}")?;

    tracing::info!("Run complete");
    Ok(())
}
