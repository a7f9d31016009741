use std::collections::{HashMap, HashSet};

use corelib::{MarketAsset, PricePoint};
use serde::de::{self, Deserializer};
use serde::Deserialize;

use crate::coingecko::errors::TransportError;

/// Non-negative integer that upstream sometimes encodes as a float
/// (`1.2e12`). Fractions are truncated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LenientU64(pub u64);

impl<'de> Deserialize<'de> for LenientU64 {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let n = serde_json::Number::deserialize(d)?;
        if let Some(v) = n.as_u64() {
            return Ok(Self(v));
        }
        match n.as_f64() {
            Some(f) if f.is_finite() && f >= 0.0 => Ok(Self(f as u64)),
            _ => Err(de::Error::custom(format!(
                "expected a non-negative number, got {n}"
            ))),
        }
    }
}

/// One record of `/coins/markets`.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketDto {
    pub id: String,
    pub name: String,
    pub symbol: String,

    pub current_price: f64,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,

    pub image: String,
    pub market_cap: LenientU64,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
}

impl TryFrom<MarketDto> for MarketAsset {
    type Error = TransportError;

    fn try_from(dto: MarketDto) -> Result<Self, Self::Error> {
        let price = checked_price(&dto.id, dto.current_price)?;

        Ok(MarketAsset {
            id: dto.id,
            name: dto.name,
            symbol: dto.symbol,
            price,
            change_percent_24h: dto.price_change_percentage_24h.unwrap_or(0.0),
            image_url: dto.image,
            market_cap: dto.market_cap.0,
            rank: dto.market_cap_rank.unwrap_or(0),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageLinks {
    #[serde(default)]
    pub thumb: Option<String>,
    #[serde(default)]
    pub small: Option<String>,
    #[serde(default)]
    pub large: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetailMarketData {
    pub current_price: HashMap<String, f64>,
    #[serde(default)]
    pub market_cap: HashMap<String, LenientU64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
}

/// Nested shape served by `/coins/{id}`; prices are keyed by currency.
#[derive(Debug, Clone, Deserialize)]
pub struct CoinDetailDto {
    pub id: String,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub image: ImageLinks,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    pub market_data: DetailMarketData,
}

/// `/coins/{id}` body: either a flat markets record or the nested detail form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CoinResponse {
    Market(MarketDto),
    Detail(CoinDetailDto),
}

impl CoinResponse {
    pub fn into_asset(self, currency: &str) -> Result<MarketAsset, TransportError> {
        match self {
            CoinResponse::Market(dto) => MarketAsset::try_from(dto),
            CoinResponse::Detail(dto) => {
                let currency = currency.to_lowercase();
                let price = dto
                    .market_data
                    .current_price
                    .get(&currency)
                    .copied()
                    .ok_or_else(|| {
                        TransportError::new(format!(
                            "no {currency} price for {} in market api response",
                            dto.id
                        ))
                    })?;
                let price = checked_price(&dto.id, price)?;

                let image_url = dto
                    .image
                    .large
                    .or(dto.image.small)
                    .or(dto.image.thumb)
                    .unwrap_or_default();

                Ok(MarketAsset {
                    market_cap: dto
                        .market_data
                        .market_cap
                        .get(&currency)
                        .map(|c| c.0)
                        .unwrap_or(0),
                    change_percent_24h: dto
                        .market_data
                        .price_change_percentage_24h
                        .unwrap_or(0.0),
                    id: dto.id,
                    name: dto.name,
                    symbol: dto.symbol,
                    price,
                    image_url,
                    rank: dto.market_cap_rank.unwrap_or(0),
                })
            }
        }
    }
}

/// `/coins/{id}/market_chart` body. Each sample is `[timestamp_ms, price]`.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketChartDto {
    pub prices: Vec<Vec<f64>>,
}

impl MarketChartDto {
    pub fn into_points(self) -> Result<Vec<PricePoint>, TransportError> {
        self.prices
            .into_iter()
            .enumerate()
            .map(|(i, sample)| match sample.as_slice() {
                [ts, price] if ts.is_finite() && price.is_finite() => {
                    Ok(PricePoint::new(*ts as i64, *price))
                }
                _ => Err(TransportError::new(format!(
                    "malformed chart sample at index {i}"
                ))),
            })
            .collect()
    }
}

/// Converts a markets page, keeping the first record of any repeated id.
pub fn markets_to_assets(dtos: Vec<MarketDto>) -> Result<Vec<MarketAsset>, TransportError> {
    let mut seen = HashSet::with_capacity(dtos.len());
    let mut out = Vec::with_capacity(dtos.len());

    for dto in dtos {
        if !seen.insert(dto.id.clone()) {
            tracing::warn!(id = %dto.id, "duplicate asset id in markets page; keeping first");
            continue;
        }
        out.push(MarketAsset::try_from(dto)?);
    }

    Ok(out)
}

fn checked_price(id: &str, price: f64) -> Result<f64, TransportError> {
    if price.is_finite() && price >= 0.0 {
        Ok(price)
    } else {
        Err(TransportError::new(format!(
            "invalid price {price} for {id} in market api response"
        )))
    }
}
