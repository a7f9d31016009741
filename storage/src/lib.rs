pub mod cache;
pub mod db;
pub mod errors;
pub mod favorites;
pub mod schema;
pub mod store;

pub use cache::{CacheStore, SqliteCacheStore};
pub use db::Db;
pub use errors::PersistenceError;
pub use favorites::{FavoritesStore, SqliteFavoritesStore};
pub use store::{PersistentStore, SqliteStore, SqliteStoreFactory, StoreFactory};
