/// User agent string for HTTP requests
pub const USER_AGENT: &str = "fetch-render/0.1.0";

/// Open-Meteo API base URL
pub const OPEN_METEO_API_BASE: &str = "https://api.open-meteo.com/v1";

/// wttr.in base URL (plain-text weather)
pub const WTTR_BASE: &str = "https://wttr.in";

/// Yahoo Finance chart endpoint; the ticker symbol is appended as a path segment
pub const YAHOO_CHART_BASE: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Request timeout used when no override is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Placeholder printed for fields the source did not provide
pub const UNAVAILABLE: &str = "N/A";
