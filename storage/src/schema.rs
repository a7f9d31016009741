use sqlx::SqlitePool;

use crate::errors::PersistenceError;

pub async fn migrate(pool: &SqlitePool) -> Result<(), PersistenceError> {
    // Last-known-good markets page
    sqlx::query(
        r#"
CREATE TABLE IF NOT EXISTS cached_crypto (
  id TEXT NOT NULL PRIMARY KEY,
  name TEXT NOT NULL,
  symbol TEXT NOT NULL,
  price REAL NOT NULL,
  changePercent24h REAL NOT NULL,
  imageUrl TEXT NOT NULL,
  marketCap INTEGER NOT NULL,
  "rank" INTEGER NOT NULL
);
"#,
    )
    .execute(pool)
    .await?;

    // Starred ids; no foreign key to cached_crypto
    sqlx::query(
        r#"
CREATE TABLE IF NOT EXISTS favorite (
  cryptoId TEXT NOT NULL PRIMARY KEY
);
"#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
