use std::sync::Arc;

use common::logger::{TraceId, root_span};
use storage::FavoritesStore;
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{Instrument, Span, debug, info, warn};

use crate::controller::intent::{Intent, Notification};
use crate::controller::notifier::Notifier;
use crate::controller::reducer::{Action, FetchKind, reduce};
use crate::controller::state::UiState;
use crate::repository::MarketRepository;

/// Drives `UiState` from user intents.
///
/// Every state change goes through `reduce`; this type only runs the
/// repository and favorites effects and feeds their outcomes back as
/// `Action`s. Errors never escape: they land in the state and/or as a
/// `ShowError` notification.
pub struct CryptoController {
    repository: Arc<dyn MarketRepository>,
    favorites: Arc<dyn FavoritesStore>,
    state: watch::Sender<UiState>,
    notifier: Notifier,
    /// Held for the duration of a list fetch; a second fetch intent that
    /// cannot take it is dropped.
    fetch_gate: Mutex<()>,
}

impl CryptoController {
    /// Builds the controller and loads the stored favorites into the state.
    pub async fn new(
        repository: Arc<dyn MarketRepository>,
        favorites: Arc<dyn FavoritesStore>,
        notification_capacity: usize,
    ) -> Arc<Self> {
        let (state, _) = watch::channel(UiState::default());

        let controller = Arc::new(Self {
            repository,
            favorites,
            state,
            notifier: Notifier::new(notification_capacity),
            fetch_gate: Mutex::new(()),
        });

        controller.load_favorites().await;
        controller
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> UiState {
        self.state.borrow().clone()
    }

    pub fn watch_state(&self) -> watch::Receiver<UiState> {
        self.state.subscribe()
    }

    /// Attaches the notification listener. Only the latest receiver gets
    /// notifications; anything emitted before the first call is buffered.
    pub fn take_notifications(&self) -> mpsc::Receiver<Notification> {
        self.notifier.subscribe()
    }

    /// Handles `intent` on the runtime without blocking the caller.
    pub fn submit(self: &Arc<Self>, intent: Intent) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move { this.dispatch(intent).await })
    }

    /// Handles `intent` to completion.
    pub async fn dispatch(&self, intent: Intent) {
        let trace_id = TraceId::new();
        let span = root_span(intent_name(&intent), &trace_id);

        async {
            match intent {
                Intent::LoadMarkets => self.fetch(FetchKind::Initial).await,
                Intent::Refresh => self.fetch(FetchKind::Refresh).await,
                Intent::Search(query) => self.apply(Action::Search(query)),
                Intent::ToggleFavorite(id) => {
                    Span::current().record("asset_id", id.as_str());
                    self.toggle_favorite(id).await;
                }
                Intent::SelectCrypto(id) => {
                    Span::current().record("asset_id", id.as_str());
                    self.apply(Action::Select(id));
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn fetch(&self, kind: FetchKind) {
        let Ok(_in_flight) = self.fetch_gate.try_lock() else {
            debug!(?kind, "fetch already in flight; intent coalesced");
            return;
        };

        if kind == FetchKind::Initial && !self.state.borrow().assets.is_empty() {
            debug!("markets already loaded; ignoring load intent");
            return;
        }

        self.apply(Action::FetchStarted(kind));

        match self.repository.fetch_markets().await {
            Ok(result) => {
                info!(
                    count = result.assets.len(),
                    from_cache = result.from_cache,
                    "markets updated"
                );
                self.apply(Action::FetchSucceeded(kind, result));
            }
            Err(e) => {
                warn!(error = %e, ?kind, "markets fetch failed");
                self.apply(Action::FetchFailed(kind, e.to_string()));
            }
        }
    }

    async fn toggle_favorite(&self, id: String) {
        let favorite = !self.state.borrow().is_favorite(&id);

        let stored = if favorite {
            self.favorites.add(&id).await
        } else {
            self.favorites.remove(&id).await
        };

        match stored {
            Ok(()) => {
                info!(favorite, "favorite updated");
                self.apply(Action::FavoriteSet { id, favorite });
            }
            Err(e) => {
                warn!(error = %e, "favorite update failed");
                self.apply(Action::FavoriteFailed {
                    message: e.to_string(),
                });
            }
        }
    }

    async fn load_favorites(&self) {
        match self.favorites.get_all().await {
            Ok(favorites) => {
                debug!(count = favorites.len(), "favorites loaded");
                self.apply(Action::FavoritesLoaded(favorites));
            }
            Err(e) => warn!(error = %e, "could not load favorites; starting with none"),
        }
    }

    fn apply(&self, action: Action) {
        let mut notifications = Vec::new();

        self.state.send_modify(|state| {
            let transition = reduce(std::mem::take(state), action);
            *state = transition.state;
            notifications = transition.notifications;
        });

        for notification in notifications {
            self.notifier.emit(notification);
        }
    }
}

fn intent_name(intent: &Intent) -> &'static str {
    match intent {
        Intent::LoadMarkets => "load_markets",
        Intent::Refresh => "refresh",
        Intent::Search(_) => "search",
        Intent::ToggleFavorite(_) => "toggle_favorite",
        Intent::SelectCrypto(_) => "select_crypto",
    }
}
