use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::logger::{child_span, warn_if_slow};
use corelib::{ChartWindow, FetchResult, MarketAsset, PricePoint};
use market::MarketDataApi;
use market::coingecko::{DEFAULT_CURRENCY, DEFAULT_LIMIT};
use storage::CacheStore;
use tracing::{Instrument, debug, info, instrument, warn};

use crate::error::RepositoryError;
use crate::repository::MarketRepository;

/// Fetch-or-fallback repository over the market client and the local cache.
///
/// Behaviour of `fetch_markets`:
/// - live success → snapshot is written to the cache (best effort) and
///   returned with `from_cache = false`
/// - live failure + non-empty cache → cached snapshot, `from_cache = true`
/// - live failure + empty cache → `EmptyFallback` carrying the live error
///
/// One attempt per call; retrying is left to the caller.
pub struct CryptoRepository {
    client: Arc<dyn MarketDataApi>,
    cache: Arc<dyn CacheStore>,
    currency: String,
    limit: u32,
}

impl CryptoRepository {
    pub fn new(client: Arc<dyn MarketDataApi>, cache: Arc<dyn CacheStore>) -> Self {
        Self {
            client,
            cache,
            currency: DEFAULT_CURRENCY.to_string(),
            limit: DEFAULT_LIMIT,
        }
    }

    /// Overrides the quote currency and page size of the list request.
    pub fn with_query(mut self, currency: impl Into<String>, limit: u32) -> Self {
        self.currency = currency.into();
        self.limit = limit;
        self
    }

    async fn cached_snapshot(&self) -> Vec<MarketAsset> {
        match self
            .cache
            .get_all()
            .instrument(child_span("cache_fallback"))
            .await
        {
            Ok(assets) => assets,
            Err(e) => {
                warn!(error = %e, "cache read failed during fallback");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl MarketRepository for CryptoRepository {
    #[instrument(skip(self), target = "repository", fields(currency = %self.currency, limit = self.limit))]
    async fn fetch_markets(&self) -> Result<FetchResult, RepositoryError> {
        let live = warn_if_slow(
            "list_markets",
            Duration::from_secs(2),
            self.client.list_markets(&self.currency, self.limit),
        )
        .await;

        match live {
            Ok(assets) => {
                let written = self
                    .cache
                    .replace_all(&assets)
                    .instrument(child_span("cache_write"))
                    .await;
                if let Err(e) = written {
                    warn!(error = %e, "cache write failed; serving live data unpersisted");
                }

                info!(count = assets.len(), "live markets fetched");
                Ok(FetchResult::live(assets))
            }
            Err(transport) => {
                warn!(error = %transport, "live markets fetch failed; trying cache");

                let cached = self.cached_snapshot().await;
                if cached.is_empty() {
                    warn!("no cached markets to fall back to");
                    return Err(RepositoryError::EmptyFallback(transport));
                }

                info!(count = cached.len(), "serving cached markets");
                Ok(FetchResult::cached(cached))
            }
        }
    }

    #[instrument(skip(self), target = "repository")]
    async fn fetch_market_by_id(&self, id: &str) -> Result<MarketAsset, RepositoryError> {
        let asset = self.client.get_market(id).await?;
        debug!(price = asset.price, "market detail fetched");
        Ok(asset)
    }

    #[instrument(skip(self), target = "repository", fields(days = window.days()))]
    async fn fetch_chart(
        &self,
        id: &str,
        window: ChartWindow,
    ) -> Result<Vec<PricePoint>, RepositoryError> {
        let points = self.client.get_chart(id, &self.currency, window).await?;
        debug!(samples = points.len(), "chart fetched");
        Ok(points)
    }
}
