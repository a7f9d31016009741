use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{info, instrument};

use crate::cache::{CacheStore, SqliteCacheStore};
use crate::db::Db;
use crate::errors::PersistenceError;
use crate::favorites::{FavoritesStore, SqliteFavoritesStore};

/// One opened database exposing both independent tables.
pub trait PersistentStore: Send + Sync {
    fn cache(&self) -> Arc<dyn CacheStore>;
    fn favorites(&self) -> Arc<dyn FavoritesStore>;
}

/// Opens the process-wide store; the concrete driver is picked at startup.
#[async_trait]
pub trait StoreFactory: Send + Sync {
    async fn open(&self) -> Result<Arc<dyn PersistentStore>, PersistenceError>;
}

pub struct SqliteStore {
    db: Db,
    cache: Arc<SqliteCacheStore>,
    favorites: Arc<SqliteFavoritesStore>,
}

impl SqliteStore {
    /// Connects and ensures the schema exists.
    pub async fn open(database_url: &str) -> Result<Self, PersistenceError> {
        let db = Db::connect(database_url).await?;
        db.migrate().await?;
        Ok(Self::from_db(db))
    }

    /// Wraps an already-migrated database.
    pub fn from_db(db: Db) -> Self {
        Self {
            cache: Arc::new(SqliteCacheStore::from_pool(db.pool.clone())),
            favorites: Arc::new(SqliteFavoritesStore::from_pool(db.pool.clone())),
            db,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }
}

impl PersistentStore for SqliteStore {
    fn cache(&self) -> Arc<dyn CacheStore> {
        self.cache.clone()
    }

    fn favorites(&self) -> Arc<dyn FavoritesStore> {
        self.favorites.clone()
    }
}

pub struct SqliteStoreFactory {
    database_url: String,
}

impl SqliteStoreFactory {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }
}

#[async_trait]
impl StoreFactory for SqliteStoreFactory {
    #[instrument(skip(self), fields(database_url = %self.database_url))]
    async fn open(&self) -> Result<Arc<dyn PersistentStore>, PersistenceError> {
        let store = SqliteStore::open(&self.database_url).await?;
        info!("persistent store opened");
        Ok(Arc::new(store))
    }
}
