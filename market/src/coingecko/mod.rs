pub mod client;
pub mod errors;
pub mod types;

use async_trait::async_trait;
use corelib::{ChartWindow, MarketAsset, PricePoint};

pub use client::{ClientConfig, CoinGeckoClient};
pub use errors::TransportError;

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_CURRENCY: &str = "usd";
pub const DEFAULT_LIMIT: u32 = 50;

/// Read-only access to the upstream market data service.
///
/// Every call is idempotent and performs a single attempt; retrying is the
/// caller's decision.
#[async_trait]
pub trait MarketDataApi: Send + Sync + 'static {
    /// First page of assets ordered by descending market cap.
    async fn list_markets(
        &self,
        currency: &str,
        limit: u32,
    ) -> Result<Vec<MarketAsset>, TransportError>;

    async fn get_market(&self, id: &str) -> Result<MarketAsset, TransportError>;

    /// Raw samples at whatever granularity upstream provides.
    async fn get_chart(
        &self,
        id: &str,
        currency: &str,
        window: ChartWindow,
    ) -> Result<Vec<PricePoint>, TransportError>;
}
