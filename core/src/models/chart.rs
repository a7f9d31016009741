use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single historical price sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Milliseconds since the unix epoch, as reported upstream.
    pub timestamp_ms: i64,
    pub price: f64,
}

impl PricePoint {
    pub fn new(timestamp_ms: i64, price: f64) -> Self {
        Self {
            timestamp_ms,
            price,
        }
    }

    /// `None` when the timestamp is outside chrono's representable range.
    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp_ms)
    }
}

/// Day windows offered by the detail chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChartWindow {
    Day,
    #[default]
    Week,
    Month,
    Quarter,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported chart window: {0} days (expected 1, 7, 30 or 90)")]
pub struct InvalidChartWindow(pub u32);

impl ChartWindow {
    pub const ALL: [ChartWindow; 4] = [
        ChartWindow::Day,
        ChartWindow::Week,
        ChartWindow::Month,
        ChartWindow::Quarter,
    ];

    pub fn days(self) -> u32 {
        match self {
            ChartWindow::Day => 1,
            ChartWindow::Week => 7,
            ChartWindow::Month => 30,
            ChartWindow::Quarter => 90,
        }
    }

    pub fn label(self) -> String {
        match self {
            ChartWindow::Day => "24h".to_string(),
            other => format!("{}d", other.days()),
        }
    }
}

impl TryFrom<u32> for ChartWindow {
    type Error = InvalidChartWindow;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        ChartWindow::ALL
            .into_iter()
            .find(|w| w.days() == days)
            .ok_or(InvalidChartWindow(days))
    }
}

impl fmt::Display for ChartWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
