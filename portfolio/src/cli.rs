use std::fmt::Write;

use clap::{Parser, Subcommand};
use corelib::format::{format_change, format_market_cap, format_price};
use corelib::{ChartWindow, MarketAsset, PricePoint};

use crate::controller::UiState;

#[derive(Debug, Parser)]
#[command(name = "zenith", version, about = "Crypto market prices with offline fallback")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List markets by market cap; falls back to the last cached list offline
    Markets {
        /// Only show assets whose name or symbol contains this text
        #[arg(long)]
        search: Option<String>,

        /// Print the full view state as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one asset with its price chart summary
    Detail {
        id: String,

        /// Chart window in days (1, 7, 30 or 90)
        #[arg(long, default_value = "7", value_parser = parse_window)]
        days: ChartWindow,
    },

    /// Star or unstar an asset
    Favorite { id: String },

    /// List starred asset ids
    Favorites,
}

fn parse_window(raw: &str) -> Result<ChartWindow, String> {
    let days: u32 = raw
        .trim()
        .parse()
        .map_err(|_| format!("not a day count: {raw}"))?;
    ChartWindow::try_from(days).map_err(|e| e.to_string())
}

pub fn render_markets(state: &UiState) -> String {
    let mut out = String::new();

    if state.from_cache {
        let _ = writeln!(out, "offline: showing last cached prices");
    }

    if state.filtered_assets.is_empty() {
        if state.search_query.trim().is_empty() {
            let _ = writeln!(out, "no markets");
        } else {
            let _ = writeln!(out, "no markets match \"{}\"", state.search_query.trim());
        }
        return out;
    }

    let _ = writeln!(
        out,
        "{:>4}  {:<8} {:<20} {:>16} {:>9} {:>10}",
        "#", "SYMBOL", "NAME", "PRICE", "24H", "MCAP"
    );
    for asset in &state.filtered_assets {
        let rank = if asset.has_rank() {
            asset.rank.to_string()
        } else {
            "-".to_string()
        };
        let star = if state.is_favorite(&asset.id) { " *" } else { "" };

        let _ = writeln!(
            out,
            "{:>4}  {:<8} {:<20} {:>16} {:>9} {:>10}{}",
            rank,
            asset.symbol.to_uppercase(),
            asset.name,
            format_price(asset.price),
            format_change(asset.change_percent_24h),
            format_market_cap(asset.market_cap),
            star
        );
    }

    out
}

pub fn render_detail(asset: &MarketAsset, window: ChartWindow, points: &[PricePoint]) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{} ({})", asset.name, asset.symbol.to_uppercase());
    let _ = writeln!(out, "price       {}", format_price(asset.price));
    let _ = writeln!(out, "24h change  {}", format_change(asset.change_percent_24h));
    let _ = writeln!(out, "market cap  {}", format_market_cap(asset.market_cap));
    if asset.has_rank() {
        let _ = writeln!(out, "rank        #{}", asset.rank);
    }

    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        let _ = writeln!(out, "chart {window}: no data");
        return out;
    };

    let low = points.iter().map(|p| p.price).fold(f64::INFINITY, f64::min);
    let high = points.iter().map(|p| p.price).fold(f64::NEG_INFINITY, f64::max);
    let _ = writeln!(
        out,
        "chart {window}: {} samples, {} -> {}",
        points.len(),
        timestamp(first),
        timestamp(last)
    );
    let _ = writeln!(
        out,
        "  open {}  close {}  low {}  high {}",
        format_price(first.price),
        format_price(last.price),
        format_price(low),
        format_price(high)
    );

    out
}

pub fn render_favorites(state: &UiState) -> String {
    if state.favorites.is_empty() {
        return "no favorites\n".to_string();
    }

    let mut ids: Vec<&String> = state.favorites.iter().collect();
    ids.sort();

    let mut out = String::new();
    for id in ids {
        let _ = writeln!(out, "{id}");
    }
    out
}

fn timestamp(point: &PricePoint) -> String {
    match point.time() {
        Some(t) => t.format("%Y-%m-%d %H:%M").to_string(),
        None => point.timestamp_ms.to_string(),
    }
}
