use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::{DEFAULT_TIMEOUT_SECS, OPEN_METEO_API_BASE, WTTR_BASE, YAHOO_CHART_BASE};

/// Environment variable overriding the request timeout in seconds
pub const TIMEOUT_ENV: &str = "FETCH_TIMEOUT_SECS";

/// Environment variable overriding the quoted ticker symbol
pub const SYMBOL_ENV: &str = "FETCH_QUOTE_SYMBOL";

/// Run configuration, passed explicitly into every source adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Per-request timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub location: Location,

    #[serde(default)]
    pub quote: QuoteConfig,

    #[serde(default)]
    pub endpoints: Endpoints,
}

/// Place the weather sources report on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
}

/// Ticker the quote source reports on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteConfig {
    pub symbol: String,
    pub company: String,
}

/// Base URLs of the external services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoints {
    #[serde(default = "default_open_meteo")]
    pub open_meteo: String,
    #[serde(default = "default_wttr")]
    pub wttr: String,
    #[serde(default = "default_yahoo_chart")]
    pub yahoo_chart: String,
}

const fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_open_meteo() -> String {
    OPEN_METEO_API_BASE.to_string()
}

fn default_wttr() -> String {
    WTTR_BASE.to_string()
}

fn default_yahoo_chart() -> String {
    YAHOO_CHART_BASE.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            location: Location::default(),
            quote: QuoteConfig::default(),
            endpoints: Endpoints::default(),
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self {
            name: "London".to_string(),
            latitude: 51.5074,
            longitude: -0.1278,
            timezone: "Europe/London".to_string(),
        }
    }
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            symbol: "MSFT".to_string(),
            company: "Microsoft Corporation".to_string(),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            open_meteo: default_open_meteo(),
            wttr: default_wttr(),
            yahoo_chart: default_yahoo_chart(),
        }
    }
}

impl AppConfig {
    /// Defaults with overrides from the process environment
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from any key/value lookup. Unparseable values are
    /// logged and ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.timeout_secs = secs,
                _ => warn!(value = %raw, "Ignoring invalid {TIMEOUT_ENV}"),
            }
        }
        if let Some(symbol) = lookup(SYMBOL_ENV) {
            let symbol = symbol.trim().to_uppercase();
            if symbol.is_empty() {
                warn!("Ignoring empty {SYMBOL_ENV}");
            } else if symbol != self.quote.symbol {
                self.quote = QuoteConfig {
                    company: symbol.clone(),
                    symbol,
                };
            }
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
