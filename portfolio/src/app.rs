use std::sync::Arc;

use anyhow::Context;
use market::{CoinGeckoClient, MarketDataApi};
use storage::{PersistentStore, StoreFactory};
use tracing::info;

use crate::config::AppConfig;
use crate::controller::CryptoController;
use crate::repository::{CryptoRepository, MarketRepository};

/// Fully wired application graph.
pub struct App {
    pub config: AppConfig,
    pub store: Arc<dyn PersistentStore>,
    pub repository: Arc<dyn MarketRepository>,
    pub controller: Arc<CryptoController>,
}

/// Opens the store through `factory`, builds the HTTP client from `cfg`
/// and wires everything together.
pub async fn assemble(cfg: AppConfig, factory: &dyn StoreFactory) -> anyhow::Result<App> {
    let store = factory
        .open()
        .await
        .with_context(|| format!("opening store at {}", cfg.database_url))?;

    let client = CoinGeckoClient::new(cfg.client_config()).context("building market client")?;

    Ok(assemble_with(cfg, store, Arc::new(client)).await)
}

/// Wires an already-opened store and client.
pub async fn assemble_with(
    cfg: AppConfig,
    store: Arc<dyn PersistentStore>,
    client: Arc<dyn MarketDataApi>,
) -> App {
    let repository: Arc<dyn MarketRepository> = Arc::new(
        CryptoRepository::new(client, store.cache())
            .with_query(cfg.vs_currency.clone(), cfg.markets_limit),
    );

    let controller = CryptoController::new(
        repository.clone(),
        store.favorites(),
        cfg.notification_capacity,
    )
    .await;

    info!(
        currency = %cfg.vs_currency,
        limit = cfg.markets_limit,
        "application assembled"
    );

    App {
        config: cfg,
        store,
        repository,
        controller,
    }
}
