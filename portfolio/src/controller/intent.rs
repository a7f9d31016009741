use serde::{Deserialize, Serialize};

/// User intents accepted by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// First load of the list; ignored once assets are present.
    LoadMarkets,
    Refresh,
    Search(String),
    ToggleFavorite(String),
    SelectCrypto(String),
}

/// One-shot side effects for the UI. Not part of the state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notification {
    ShowError(String),
    ShowToast(String),
    NavigateToDetail(String),
    /// The list on screen came from the offline cache.
    ShowCacheWarning,
}
