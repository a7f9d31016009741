use serde::{Deserialize, Serialize};

/// One cryptocurrency's market snapshot.
///
/// Built either from an upstream API record or from a cache row. Values are
/// never patched in place; a refresh supersedes the whole snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAsset {
    /// Stable upstream key, unique within a collection.
    pub id: String,
    pub name: String,
    pub symbol: String,

    /// Price in the requested quote currency.
    pub price: f64,
    /// Signed 24h change in percent.
    pub change_percent_24h: f64,

    pub image_url: String,
    pub market_cap: u64,

    /// Market-cap rank, 0 when upstream does not know it.
    pub rank: u32,
}

impl MarketAsset {
    /// Case-insensitive substring match against name or symbol.
    /// A blank query matches everything; otherwise whitespace in the query
    /// is significant.
    pub fn matches(&self, query: &str) -> bool {
        if query.trim().is_empty() {
            return true;
        }
        let q = query.to_lowercase();
        self.name.to_lowercase().contains(&q) || self.symbol.to_lowercase().contains(&q)
    }

    pub fn has_rank(&self) -> bool {
        self.rank > 0
    }
}

/// Outcome of one list fetch, tagged with where the data came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchResult {
    pub assets: Vec<MarketAsset>,
    /// `true` when the live call failed and the last-known-good cache was served.
    pub from_cache: bool,
}

impl FetchResult {
    pub fn live(assets: Vec<MarketAsset>) -> Self {
        Self {
            assets,
            from_cache: false,
        }
    }

    pub fn cached(assets: Vec<MarketAsset>) -> Self {
        Self {
            assets,
            from_cache: true,
        }
    }
}
