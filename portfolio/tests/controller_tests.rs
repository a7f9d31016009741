mod mock_market;

use std::sync::Arc;
use std::time::Duration;

use mock_market::{ScriptedMarket, asset, top_three};
use mock_store::{InMemoryCache, InMemoryFavorites};
use portfolio::controller::{CryptoController, Intent, Notification};
use portfolio::repository::CryptoRepository;
use tokio::sync::{Notify, mpsc};

struct Harness {
    controller: Arc<CryptoController>,
    client: Arc<ScriptedMarket>,
    cache: Arc<InMemoryCache>,
    favorites: Arc<InMemoryFavorites>,
    notifications: mpsc::Receiver<Notification>,
}

async fn harness_with(
    client: ScriptedMarket,
    cache: InMemoryCache,
    favorites: InMemoryFavorites,
) -> Harness {
    let client = Arc::new(client);
    let cache = Arc::new(cache);
    let favorites = Arc::new(favorites);

    let repository = Arc::new(CryptoRepository::new(client.clone(), cache.clone()));
    let controller = CryptoController::new(repository, favorites.clone(), 16).await;
    let notifications = controller.take_notifications();

    Harness {
        controller,
        client,
        cache,
        favorites,
        notifications,
    }
}

async fn harness(client: ScriptedMarket) -> Harness {
    harness_with(client, InMemoryCache::default(), InMemoryFavorites::default()).await
}

fn drain(rx: &mut mpsc::Receiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(n) = rx.try_recv() {
        out.push(n);
    }
    out
}

#[tokio::test]
async fn load_markets_shows_live_data_quietly() {
    let mut h = harness(ScriptedMarket::new().then_ok(top_three())).await;

    h.controller.dispatch(Intent::LoadMarkets).await;

    let state = h.controller.state();
    assert!(!state.is_loading);
    assert!(!state.from_cache);
    assert_eq!(state.assets, top_three());
    assert_eq!(state.filtered_assets, top_three());
    assert_eq!(state.error, None);
    assert!(drain(&mut h.notifications).is_empty());
    assert_eq!(*h.cache.assets.lock(), top_three());
}

#[tokio::test]
async fn load_markets_is_ignored_once_assets_are_present() {
    let h = harness(ScriptedMarket::new().then_ok(top_three()).then_ok(vec![])).await;

    h.controller.dispatch(Intent::LoadMarkets).await;
    h.controller.dispatch(Intent::LoadMarkets).await;

    assert_eq!(h.client.list_calls(), 1);
    assert_eq!(h.controller.state().assets.len(), 3);
}

#[tokio::test]
async fn offline_load_falls_back_to_cache_and_warns() {
    let mut h = harness_with(
        ScriptedMarket::new().then_err("could not reach market api"),
        InMemoryCache::seeded(top_three()),
        InMemoryFavorites::default(),
    )
    .await;

    h.controller.dispatch(Intent::LoadMarkets).await;

    let state = h.controller.state();
    assert!(state.from_cache);
    assert_eq!(state.assets, top_three());
    assert_eq!(state.error, None);
    assert_eq!(drain(&mut h.notifications), vec![Notification::ShowCacheWarning]);
}

#[tokio::test]
async fn offline_load_without_cache_reports_the_transport_error() {
    let mut h = harness(ScriptedMarket::new().then_err("market api returned 500 Internal Server Error")).await;

    h.controller.dispatch(Intent::LoadMarkets).await;

    let state = h.controller.state();
    assert!(!state.is_loading);
    assert!(state.assets.is_empty());
    assert_eq!(
        state.error.as_deref(),
        Some("market api returned 500 Internal Server Error")
    );
    assert_eq!(
        drain(&mut h.notifications),
        vec![Notification::ShowError(
            "market api returned 500 Internal Server Error".into()
        )]
    );
}

#[tokio::test]
async fn failed_refresh_keeps_what_is_on_screen() {
    let mut h = harness(ScriptedMarket::new().then_ok(top_three())).await;
    h.controller.dispatch(Intent::LoadMarkets).await;

    // the cache now holds the live list, so make the fallback miss too
    h.cache.assets.lock().clear();
    h.client.push_err("timeout");
    h.controller.dispatch(Intent::Refresh).await;

    let state = h.controller.state();
    assert!(!state.is_refreshing);
    assert_eq!(state.assets, top_three());
    assert_eq!(state.error, None);
    assert_eq!(
        drain(&mut h.notifications),
        vec![Notification::ShowError("timeout".into())]
    );
}

#[tokio::test]
async fn refresh_recovers_from_a_failed_load() {
    let mut h = harness(ScriptedMarket::new().then_err("offline").then_ok(top_three())).await;

    h.controller.dispatch(Intent::LoadMarkets).await;
    assert!(h.controller.state().error.is_some());

    h.controller.dispatch(Intent::Refresh).await;

    let state = h.controller.state();
    assert_eq!(state.error, None);
    assert_eq!(state.assets, top_three());
    assert!(!state.from_cache);
    assert_eq!(
        drain(&mut h.notifications),
        vec![Notification::ShowError("offline".into())]
    );
}

#[tokio::test]
async fn refresh_served_from_cache_flags_staleness() {
    let mut h = harness(ScriptedMarket::new().then_ok(top_three()).then_err("offline")).await;

    h.controller.dispatch(Intent::LoadMarkets).await;
    h.controller.dispatch(Intent::Refresh).await;

    let state = h.controller.state();
    assert!(state.from_cache);
    assert_eq!(state.assets, top_three());
    assert_eq!(drain(&mut h.notifications), vec![Notification::ShowCacheWarning]);
}

#[tokio::test]
async fn search_narrows_and_blank_restores() {
    let h = harness(ScriptedMarket::new().then_ok(top_three())).await;
    h.controller.dispatch(Intent::LoadMarkets).await;

    h.controller.dispatch(Intent::Search("ETH".into())).await;
    let state = h.controller.state();
    assert_eq!(state.search_query, "ETH");
    assert_eq!(state.filtered_assets, vec![asset("ethereum", "Ethereum", "eth")]);

    h.controller.dispatch(Intent::Search("  ".into())).await;
    assert_eq!(h.controller.state().filtered_assets, top_three());
}

#[tokio::test]
async fn favorites_are_loaded_at_construction() {
    let h = harness_with(
        ScriptedMarket::new(),
        InMemoryCache::default(),
        InMemoryFavorites::seeded(&["bitcoin", "delisted"]),
    )
    .await;

    let state = h.controller.state();
    assert!(state.is_favorite("bitcoin"));
    assert!(state.is_favorite("delisted"));
}

#[tokio::test]
async fn unreadable_favorites_start_empty() {
    let h = harness_with(
        ScriptedMarket::new(),
        InMemoryCache::default(),
        InMemoryFavorites::failing(),
    )
    .await;

    assert!(h.controller.state().favorites.is_empty());
}

#[tokio::test]
async fn toggling_twice_restores_membership() {
    let mut h = harness(ScriptedMarket::new()).await;

    h.controller
        .dispatch(Intent::ToggleFavorite("solana".into()))
        .await;
    assert!(h.controller.state().is_favorite("solana"));
    assert!(h.favorites.contains("solana"));

    h.controller
        .dispatch(Intent::ToggleFavorite("solana".into()))
        .await;
    assert!(!h.controller.state().is_favorite("solana"));
    assert!(!h.favorites.contains("solana"));

    let toast = Notification::ShowToast("Favorite updated".into());
    assert_eq!(drain(&mut h.notifications), vec![toast.clone(), toast]);
}

#[tokio::test]
async fn favorite_store_failure_leaves_state_alone() {
    let mut h = harness(ScriptedMarket::new()).await;
    *h.favorites.fail.lock() = true;
    let before = h.controller.state();

    h.controller
        .dispatch(Intent::ToggleFavorite("bitcoin".into()))
        .await;

    assert_eq!(h.controller.state(), before);
    let notes = drain(&mut h.notifications);
    assert_eq!(notes.len(), 1);
    assert!(matches!(&notes[0], Notification::ShowError(m) if m.contains("favorite add failed")));
}

#[tokio::test]
async fn select_navigates_without_touching_state() {
    let mut h = harness(ScriptedMarket::new()).await;
    let before = h.controller.state();

    h.controller
        .dispatch(Intent::SelectCrypto("bitcoin".into()))
        .await;

    assert_eq!(h.controller.state(), before);
    assert_eq!(
        drain(&mut h.notifications),
        vec![Notification::NavigateToDetail("bitcoin".into())]
    );
}

#[tokio::test]
async fn notifications_emitted_before_subscribing_are_kept() {
    let client = Arc::new(ScriptedMarket::new().then_err("offline"));
    let repository = Arc::new(CryptoRepository::new(client, Arc::new(InMemoryCache::default())));
    let controller =
        CryptoController::new(repository, Arc::new(InMemoryFavorites::default()), 4).await;

    controller.dispatch(Intent::LoadMarkets).await;
    let mut rx = controller.take_notifications();

    assert_eq!(drain(&mut rx), vec![Notification::ShowError("offline".into())]);
}

#[tokio::test]
async fn concurrent_fetch_intents_are_coalesced() {
    let gate = Arc::new(Notify::new());
    let h = harness(
        ScriptedMarket::new()
            .then_ok(top_three())
            .gated(gate.clone()),
    )
    .await;

    let mut watch = h.controller.watch_state();
    let load = h.controller.submit(Intent::LoadMarkets);

    tokio::time::timeout(Duration::from_secs(5), watch.wait_for(|s| s.is_loading))
        .await
        .expect("load never started")
        .unwrap();

    // dropped while the load holds the fetch
    h.controller.dispatch(Intent::Refresh).await;
    assert!(!h.controller.state().is_refreshing);

    gate.notify_one();
    load.await.unwrap();

    let state = h.controller.state();
    assert_eq!(h.client.list_calls(), 1);
    assert!(!state.is_loading);
    assert_eq!(state.assets, top_three());
}

#[tokio::test]
async fn state_watchers_see_the_final_snapshot() {
    let h = harness(ScriptedMarket::new().then_ok(top_three())).await;
    let mut watch = h.controller.watch_state();

    h.controller.submit(Intent::LoadMarkets).await.unwrap();

    let seen = watch
        .wait_for(|s| !s.assets.is_empty())
        .await
        .unwrap()
        .clone();
    assert_eq!(seen, h.controller.state());
}
