use std::time::Duration;

use market::ClientConfig;
use market::coingecko::{DEFAULT_BASE_URL, DEFAULT_CURRENCY, DEFAULT_LIMIT};

/// Upstream `per_page` ceiling.
const MAX_MARKETS_LIMIT: u32 = 250;

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// SQLite connection string for the cache and favorites tables.
    /// `sqlite::memory:` keeps everything in-process.
    pub database_url: String,

    // =========================
    // Market data configuration
    // =========================
    /// Root of the CoinGecko v3 API.
    pub market_api_url: String,

    /// Optional demo/pro key, sent as a request header.
    pub market_api_key: Option<String>,

    /// Quote currency for prices, market caps and charts.
    pub vs_currency: String,

    /// Page size of the markets list.
    ///
    /// Clamped to 1..=250 (the upstream maximum).
    pub markets_limit: u32,

    /// Per-request timeout. A single attempt is made per fetch, so this is
    /// also the longest a refresh can take before falling back to cache.
    pub http_timeout_ms: u64,

    // =========================
    // Controller configuration
    // =========================
    /// Capacity of the one-shot notification queue.
    ///
    /// Notifications emitted while the queue is full are dropped.
    pub notification_capacity: usize,

    /// JSON log output (production) instead of the pretty formatter.
    pub log_json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://zenith.db".to_string(),
            market_api_url: DEFAULT_BASE_URL.to_string(),
            market_api_key: None,
            vs_currency: DEFAULT_CURRENCY.to_string(),
            markets_limit: DEFAULT_LIMIT,
            http_timeout_ms: 10_000,
            notification_capacity: 32,
            log_json: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset or unparsable values
    /// keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            database_url: non_empty("DATABASE_URL").unwrap_or(d.database_url),
            market_api_url: non_empty("MARKET_API_URL").unwrap_or(d.market_api_url),
            market_api_key: non_empty("MARKET_API_KEY"),
            vs_currency: non_empty("VS_CURRENCY")
                .map(|c| c.to_lowercase())
                .unwrap_or(d.vs_currency),
            markets_limit: parsed(&non_empty, "MARKETS_LIMIT", d.markets_limit)
                .clamp(1, MAX_MARKETS_LIMIT),
            http_timeout_ms: parsed(&non_empty, "HTTP_TIMEOUT_MS", d.http_timeout_ms),
            notification_capacity: parsed(
                &non_empty,
                "NOTIFICATION_CAPACITY",
                d.notification_capacity,
            )
            .max(1),
            log_json: non_empty("APP_ENV").is_some_and(|env| env == "production"),
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.market_api_url.clone(),
            api_key: self.market_api_key.clone(),
            vs_currency: self.vs_currency.clone(),
            timeout: Duration::from_millis(self.http_timeout_ms),
        }
    }
}

fn parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "ignoring unparsable config value");
            default
        }),
        None => default,
    }
}
