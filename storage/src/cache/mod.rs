pub mod sqlite_store;

use async_trait::async_trait;
use corelib::MarketAsset;

use crate::errors::PersistenceError;

pub use sqlite_store::SqliteCacheStore;

/// Last-known-good copy of the markets list.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Swaps the whole cached set. Readers observe either the previous set
    /// or the new one, never a mix.
    async fn replace_all(&self, assets: &[MarketAsset]) -> Result<(), PersistenceError>;

    /// Cached assets in store order.
    async fn get_all(&self) -> Result<Vec<MarketAsset>, PersistenceError>;
}
