pub mod coingecko;

pub use coingecko::{ClientConfig, CoinGeckoClient, MarketDataApi, TransportError};
