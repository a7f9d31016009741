//! SQLite-backed market cache.
//!
//! Holds a single snapshot of the markets list in `cached_crypto`. Writes
//! replace the snapshot wholesale inside one transaction; reads map rows
//! back into `MarketAsset`, skipping rows that no longer decode.
use std::time::Duration;

use async_trait::async_trait;
use common::logger::warn_if_slow;
use corelib::MarketAsset;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{debug, instrument, warn};

use super::CacheStore;
use crate::errors::PersistenceError;

const TABLE: &str = "cached_crypto";

pub struct SqliteCacheStore {
    pool: SqlitePool,
}

impl SqliteCacheStore {
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CacheStore for SqliteCacheStore {
    #[instrument(skip(self, assets), target = "cache", fields(count = assets.len()))]
    async fn replace_all(&self, assets: &[MarketAsset]) -> Result<(), PersistenceError> {
        // Convert before opening the transaction so a bad value never
        // leaves the old snapshot half-deleted.
        let rows = assets
            .iter()
            .map(|a| Ok((a, u64_to_i64("marketCap", a.market_cap)?)))
            .collect::<Result<Vec<_>, PersistenceError>>()?;

        warn_if_slow("cache_replace_all", Duration::from_millis(200), async {
            let mut tx = self.pool.begin().await?;

            sqlx::query("DELETE FROM cached_crypto")
                .execute(&mut *tx)
                .await?;

            for (asset, market_cap) in rows {
                sqlx::query(
                    r#"
INSERT OR REPLACE INTO cached_crypto (
  id, name, symbol, price, changePercent24h, imageUrl, marketCap, "rank"
)
VALUES (?, ?, ?, ?, ?, ?, ?, ?);
"#,
                )
                .bind(&asset.id)
                .bind(&asset.name)
                .bind(&asset.symbol)
                .bind(asset.price)
                .bind(asset.change_percent_24h)
                .bind(&asset.image_url)
                .bind(market_cap)
                .bind(i64::from(asset.rank))
                .execute(&mut *tx)
                .await?;
            }

            tx.commit().await?;
            Ok::<_, PersistenceError>(())
        })
        .await?;

        debug!("cache snapshot replaced");
        Ok(())
    }

    #[instrument(skip(self), target = "cache")]
    async fn get_all(&self) -> Result<Vec<MarketAsset>, PersistenceError> {
        let rows = warn_if_slow("cache_get_all", Duration::from_millis(100), async {
            sqlx::query(
                r#"
SELECT id, name, symbol, price, changePercent24h, imageUrl, marketCap, "rank"
FROM cached_crypto
ORDER BY rowid;
"#,
            )
            .fetch_all(&self.pool)
            .await
        })
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for r in rows {
            match row_to_asset(&r) {
                Ok(a) => out.push(a),
                Err(e) => {
                    // poison-row resilience: skip but keep the rest of the snapshot
                    warn!(error = %e, "skipping malformed cache row");
                }
            }
        }

        debug!(count = out.len(), "cache snapshot loaded");
        Ok(out)
    }
}

/* =========================
Row mapping + conversions
========================= */

fn row_to_asset(r: &SqliteRow) -> Result<MarketAsset, PersistenceError> {
    let invalid = |e: sqlx::Error| PersistenceError::InvalidRow {
        table: TABLE,
        reason: e.to_string(),
    };

    Ok(MarketAsset {
        id: r.try_get("id").map_err(invalid)?,
        name: r.try_get("name").map_err(invalid)?,
        symbol: r.try_get("symbol").map_err(invalid)?,
        price: r.try_get("price").map_err(invalid)?,
        change_percent_24h: r.try_get("changePercent24h").map_err(invalid)?,
        image_url: r.try_get("imageUrl").map_err(invalid)?,
        market_cap: i64_to_u64("marketCap", r.try_get("marketCap").map_err(invalid)?)?,
        rank: i64_to_u32("rank", r.try_get("rank").map_err(invalid)?)?,
    })
}

fn i64_to_u64(column: &'static str, v: i64) -> Result<u64, PersistenceError> {
    u64::try_from(v).map_err(|_| PersistenceError::InvalidRow {
        table: TABLE,
        reason: format!("negative {column}: {v}"),
    })
}

fn i64_to_u32(column: &'static str, v: i64) -> Result<u32, PersistenceError> {
    u32::try_from(v).map_err(|_| PersistenceError::InvalidRow {
        table: TABLE,
        reason: format!("{column} out of range for u32: {v}"),
    })
}

fn u64_to_i64(column: &'static str, v: u64) -> Result<i64, PersistenceError> {
    i64::try_from(v).map_err(|_| PersistenceError::OutOfRange {
        column,
        value: v.to_string(),
    })
}
