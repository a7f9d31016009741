use std::collections::HashSet;

use corelib::MarketAsset;
use serde::Serialize;

/// Everything the list screen renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UiState {
    pub is_loading: bool,
    pub is_refreshing: bool,
    pub assets: Vec<MarketAsset>,
    /// `assets` narrowed by `search_query`.
    pub filtered_assets: Vec<MarketAsset>,
    pub favorites: HashSet<String>,
    pub search_query: String,
    pub error: Option<String>,
    /// The current assets are a cached snapshot, possibly outdated.
    pub from_cache: bool,
}

impl UiState {
    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }
}

/// Assets whose name or symbol contains `query`, ignoring case.
pub fn filter_assets(assets: &[MarketAsset], query: &str) -> Vec<MarketAsset> {
    assets.iter().filter(|a| a.matches(query)).cloned().collect()
}
