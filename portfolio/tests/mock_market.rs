#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use corelib::{ChartWindow, MarketAsset, PricePoint};
use market::{MarketDataApi, TransportError};
use parking_lot::Mutex;
use tokio::sync::Notify;

/// Market client that replays queued list responses in order.
#[derive(Default)]
pub struct ScriptedMarket {
    lists: Mutex<VecDeque<Result<Vec<MarketAsset>, TransportError>>>,
    list_queries: Mutex<Vec<(String, u32)>>,
    detail: Mutex<Option<MarketAsset>>,
    chart: Mutex<Vec<PricePoint>>,
    chart_requests: Mutex<Vec<(String, ChartWindow)>>,
    /// When set, `list_markets` waits for a permit before answering.
    gate: Option<Arc<Notify>>,
}

impl ScriptedMarket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_ok(self, assets: Vec<MarketAsset>) -> Self {
        self.lists.lock().push_back(Ok(assets));
        self
    }

    pub fn then_err(self, message: &str) -> Self {
        self.lists
            .lock()
            .push_back(Err(TransportError::new(message)));
        self
    }

    pub fn with_detail(self, asset: MarketAsset) -> Self {
        *self.detail.lock() = Some(asset);
        self
    }

    pub fn with_chart(self, points: Vec<PricePoint>) -> Self {
        *self.chart.lock() = points;
        self
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn push_ok(&self, assets: Vec<MarketAsset>) {
        self.lists.lock().push_back(Ok(assets));
    }

    pub fn push_err(&self, message: &str) {
        self.lists.lock().push_back(Err(TransportError::new(message)));
    }

    pub fn list_calls(&self) -> usize {
        self.list_queries.lock().len()
    }

    /// `(currency, limit)` of every list request, in call order.
    pub fn list_queries(&self) -> Vec<(String, u32)> {
        self.list_queries.lock().clone()
    }

    /// `(currency, window)` of every chart request, in call order.
    pub fn chart_requests(&self) -> Vec<(String, ChartWindow)> {
        self.chart_requests.lock().clone()
    }
}

#[async_trait]
impl MarketDataApi for ScriptedMarket {
    async fn list_markets(
        &self,
        currency: &str,
        limit: u32,
    ) -> Result<Vec<MarketAsset>, TransportError> {
        self.list_queries.lock().push((currency.to_string(), limit));

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        self.lists
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::new("no scripted response")))
    }

    async fn get_market(&self, id: &str) -> Result<MarketAsset, TransportError> {
        self.detail
            .lock()
            .clone()
            .filter(|a| a.id == id)
            .ok_or_else(|| TransportError::new("market api returned 404 Not Found"))
    }

    async fn get_chart(
        &self,
        _id: &str,
        currency: &str,
        window: ChartWindow,
    ) -> Result<Vec<PricePoint>, TransportError> {
        self.chart_requests.lock().push((currency.to_string(), window));
        Ok(self.chart.lock().clone())
    }
}

pub fn asset(id: &str, name: &str, symbol: &str) -> MarketAsset {
    MarketAsset {
        id: id.to_string(),
        name: name.to_string(),
        symbol: symbol.to_string(),
        price: 100.0,
        change_percent_24h: 1.0,
        image_url: format!("https://img/{id}.png"),
        market_cap: 1_000_000,
        rank: 1,
    }
}

/// The BTC record as parsed from a markets entry that omits the optional
/// change and rank fields.
pub fn bare_btc() -> MarketAsset {
    MarketAsset {
        id: "btc".to_string(),
        name: "Bitcoin".to_string(),
        symbol: "btc".to_string(),
        price: 50_000.0,
        change_percent_24h: 0.0,
        image_url: "u".to_string(),
        market_cap: 1_000_000_000,
        rank: 0,
    }
}

pub fn top_three() -> Vec<MarketAsset> {
    vec![
        asset("bitcoin", "Bitcoin", "btc"),
        asset("ethereum", "Ethereum", "eth"),
        asset("solana", "Solana", "sol"),
    ]
}
