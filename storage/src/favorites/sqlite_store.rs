use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use common::logger::warn_if_slow;
use sqlx::{Row, SqlitePool};
use tracing::{debug, instrument};

use super::FavoritesStore;
use crate::errors::PersistenceError;

pub struct SqliteFavoritesStore {
    pool: SqlitePool,
}

impl SqliteFavoritesStore {
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FavoritesStore for SqliteFavoritesStore {
    #[instrument(skip(self), target = "favorites")]
    async fn get_all(&self) -> Result<HashSet<String>, PersistenceError> {
        let rows = warn_if_slow("favorites_get_all", Duration::from_millis(50), async {
            sqlx::query("SELECT cryptoId FROM favorite")
                .fetch_all(&self.pool)
                .await
        })
        .await?;

        let ids = rows
            .iter()
            .map(|r| r.try_get::<String, _>("cryptoId"))
            .collect::<Result<HashSet<_>, _>>()?;

        debug!(count = ids.len(), "favorites loaded");
        Ok(ids)
    }

    #[instrument(skip(self), target = "favorites")]
    async fn add(&self, id: &str) -> Result<(), PersistenceError> {
        let res = sqlx::query("INSERT OR IGNORE INTO favorite (cryptoId) VALUES (?)")
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!(inserted = res.rows_affected(), "favorite added");
        Ok(())
    }

    #[instrument(skip(self), target = "favorites")]
    async fn remove(&self, id: &str) -> Result<(), PersistenceError> {
        let res = sqlx::query("DELETE FROM favorite WHERE cryptoId = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!(deleted = res.rows_affected(), "favorite removed");
        Ok(())
    }
}
