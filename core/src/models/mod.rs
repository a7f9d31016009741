mod asset;
mod chart;

pub use asset::{FetchResult, MarketAsset};
pub use chart::{ChartWindow, InvalidChartWindow, PricePoint};
