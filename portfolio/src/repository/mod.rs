pub mod crypto;

use async_trait::async_trait;
use corelib::{ChartWindow, FetchResult, MarketAsset, PricePoint};

use crate::error::RepositoryError;

pub use crypto::CryptoRepository;

#[async_trait]
pub trait MarketRepository: Send + Sync {
    /// Live markets list, or the cached snapshot when upstream is unavailable.
    async fn fetch_markets(&self) -> Result<FetchResult, RepositoryError>;

    /// Detail lookup; never served from cache.
    async fn fetch_market_by_id(&self, id: &str) -> Result<MarketAsset, RepositoryError>;

    /// Chart samples; never served from cache.
    async fn fetch_chart(
        &self,
        id: &str,
        window: ChartWindow,
    ) -> Result<Vec<PricePoint>, RepositoryError>;
}
