use std::time::Duration;

use async_trait::async_trait;
use corelib::{ChartWindow, MarketAsset, PricePoint};
use reqwest::{Client, RequestBuilder};
use tracing::{debug, instrument};

use crate::coingecko::errors::TransportError;
use crate::coingecko::types::{CoinResponse, MarketChartDto, MarketDto, markets_to_assets};
use crate::coingecko::{DEFAULT_BASE_URL, DEFAULT_CURRENCY, MarketDataApi};

const API_KEY_HEADER: &str = "x-cg-demo-api-key";

#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Root of the v3 API, without a trailing slash.
    pub base_url: String,
    /// Sent as `x-cg-demo-api-key` when present.
    pub api_key: Option<String>,
    /// Quote currency for detail lookups.
    pub vs_currency: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            vs_currency: DEFAULT_CURRENCY.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP client for the CoinGecko v3 market endpoints.
#[derive(Clone)]
pub struct CoinGeckoClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    vs_currency: String,
}

impl CoinGeckoClient {
    pub fn new(cfg: ClientConfig) -> Result<Self, TransportError> {
        let http = Client::builder()
            .timeout(cfg.timeout)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(30))
            .build()?;

        Ok(Self::with_http(http, cfg))
    }

    /// Uses a caller-built `reqwest::Client`; `cfg.timeout` is ignored.
    pub fn with_http(http: Client, cfg: ClientConfig) -> Self {
        Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key,
            vs_currency: cfg.vs_currency,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let req = self.http.get(format!("{}{}", self.base_url, path));
        match &self.api_key {
            Some(key) => req.header(API_KEY_HEADER, key),
            None => req,
        }
    }
}

#[async_trait]
impl MarketDataApi for CoinGeckoClient {
    #[instrument(skip(self), level = "debug")]
    async fn list_markets(
        &self,
        currency: &str,
        limit: u32,
    ) -> Result<Vec<MarketAsset>, TransportError> {
        let resp = self
            .get("/coins/markets")
            .query(&[
                ("vs_currency", currency.to_string()),
                ("order", "market_cap_desc".to_string()),
                ("per_page", limit.to_string()),
                ("page", "1".to_string()),
                ("sparkline", "false".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let dtos: Vec<MarketDto> = resp.json().await?;
        let assets = markets_to_assets(dtos)?;

        debug!(count = assets.len(), "markets page fetched");
        Ok(assets)
    }

    #[instrument(skip(self), level = "debug")]
    async fn get_market(&self, id: &str) -> Result<MarketAsset, TransportError> {
        let id = checked_id(id)?;

        let resp = self
            .get(&format!("/coins/{id}"))
            .send()
            .await?
            .error_for_status()?;

        let body: CoinResponse = resp.json().await?;
        let asset = body.into_asset(&self.vs_currency)?;

        debug!(price = asset.price, "coin fetched");
        Ok(asset)
    }

    #[instrument(skip(self), fields(days = window.days()), level = "debug")]
    async fn get_chart(
        &self,
        id: &str,
        currency: &str,
        window: ChartWindow,
    ) -> Result<Vec<PricePoint>, TransportError> {
        let id = checked_id(id)?;

        let resp = self
            .get(&format!("/coins/{id}/market_chart"))
            .query(&[
                ("vs_currency", currency.to_string()),
                ("days", window.days().to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let chart: MarketChartDto = resp.json().await?;
        let points = chart.into_points()?;

        debug!(samples = points.len(), "market chart fetched");
        Ok(points)
    }
}

/// Ids are interpolated into the path, so anything that would change the
/// route is refused before a request is made.
fn checked_id(id: &str) -> Result<&str, TransportError> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(id)
    } else {
        Err(TransportError::new(format!("invalid asset id: {id:?}")))
    }
}
