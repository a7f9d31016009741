pub mod format;
pub mod models;

pub use models::{ChartWindow, FetchResult, MarketAsset, PricePoint};
