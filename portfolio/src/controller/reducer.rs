use std::collections::HashSet;

use corelib::FetchResult;

use crate::controller::intent::Notification;
use crate::controller::state::{UiState, filter_assets};

pub const FAVORITE_UPDATED: &str = "Favorite updated";

/// Which fetch flag an in-flight request owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// `LoadMarkets`; drives `is_loading` and `error`.
    Initial,
    /// `Refresh`; drives `is_refreshing` and never sets `error`.
    Refresh,
}

/// Everything that can change `UiState`, including the outcomes of effects.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    FetchStarted(FetchKind),
    FetchSucceeded(FetchKind, FetchResult),
    FetchFailed(FetchKind, String),
    Search(String),
    FavoritesLoaded(HashSet<String>),
    FavoriteSet { id: String, favorite: bool },
    FavoriteFailed { message: String },
    Select(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: UiState,
    pub notifications: Vec<Notification>,
}

impl Transition {
    fn quiet(state: UiState) -> Self {
        Self {
            state,
            notifications: Vec::new(),
        }
    }

    fn notify(state: UiState, notification: Notification) -> Self {
        Self {
            state,
            notifications: vec![notification],
        }
    }
}

pub fn reduce(mut state: UiState, action: Action) -> Transition {
    match action {
        Action::FetchStarted(FetchKind::Initial) => {
            state.is_loading = true;
            state.error = None;
            Transition::quiet(state)
        }
        Action::FetchStarted(FetchKind::Refresh) => {
            state.is_refreshing = true;
            Transition::quiet(state)
        }

        Action::FetchSucceeded(kind, result) => {
            clear_flag(&mut state, kind);
            state.filtered_assets = match kind {
                FetchKind::Initial => result.assets.clone(),
                FetchKind::Refresh => filter_assets(&result.assets, &state.search_query),
            };
            state.assets = result.assets;
            state.from_cache = result.from_cache;
            state.error = None;

            if result.from_cache {
                Transition::notify(state, Notification::ShowCacheWarning)
            } else {
                Transition::quiet(state)
            }
        }
        Action::FetchFailed(kind, message) => {
            clear_flag(&mut state, kind);
            if kind == FetchKind::Initial {
                state.error = Some(message.clone());
            }
            Transition::notify(state, Notification::ShowError(message))
        }

        Action::Search(query) => {
            state.filtered_assets = filter_assets(&state.assets, &query);
            state.search_query = query;
            Transition::quiet(state)
        }

        Action::FavoritesLoaded(favorites) => {
            state.favorites = favorites;
            Transition::quiet(state)
        }
        Action::FavoriteSet { id, favorite } => {
            if favorite {
                state.favorites.insert(id);
            } else {
                state.favorites.remove(&id);
            }
            Transition::notify(state, Notification::ShowToast(FAVORITE_UPDATED.to_string()))
        }
        Action::FavoriteFailed { message } => {
            Transition::notify(state, Notification::ShowError(message))
        }

        Action::Select(id) => Transition::notify(state, Notification::NavigateToDetail(id)),
    }
}

fn clear_flag(state: &mut UiState, kind: FetchKind) {
    match kind {
        FetchKind::Initial => state.is_loading = false,
        FetchKind::Refresh => state.is_refreshing = false,
    }
}
