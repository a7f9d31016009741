pub mod sqlite_store;

use std::collections::HashSet;

use async_trait::async_trait;

use crate::errors::PersistenceError;

pub use sqlite_store::SqliteFavoritesStore;

/// Starred asset ids. Add and remove are idempotent, and ids are not checked
/// against the cache, so a favorite may outlive the asset it points to.
#[async_trait]
pub trait FavoritesStore: Send + Sync {
    async fn get_all(&self) -> Result<HashSet<String>, PersistenceError>;
    async fn add(&self, id: &str) -> Result<(), PersistenceError>;
    async fn remove(&self, id: &str) -> Result<(), PersistenceError>;
}
