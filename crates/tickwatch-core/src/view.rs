//! Derived presentation values computed from a fetched bar series.

use serde::{Deserialize, Serialize};

use crate::Bar;

/// Headline numbers for a symbol, derived from the two most recent closes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSummary {
    pub current_price: f64,
    pub prior_close: f64,
    pub price_change: f64,
    pub percent_change: f64,
}

impl PriceSummary {
    /// Derive the summary from a chronological series.
    ///
    /// A single-bar series uses its own close as the prior close, yielding a
    /// zero change. Returns `None` for an empty series. A zero prior close
    /// pins the percent change to exactly `0.0` instead of dividing.
    pub fn from_bars(bars: &[Bar]) -> Option<Self> {
        let current = bars.last()?;
        let prior_close = if bars.len() >= 2 {
            bars[bars.len() - 2].close
        } else {
            current.close
        };

        let current_price = current.close;
        let price_change = current_price - prior_close;
        let percent_change = if prior_close == 0.0 {
            0.0
        } else {
            price_change / prior_close * 100.0
        };

        Some(Self {
            current_price,
            prior_close,
            price_change,
            percent_change,
        })
    }
}

/// Market capitalization rendered the way the dashboard shows it:
/// billions with two decimals at or above 1e9, millions below.
pub fn format_market_cap(value: f64) -> String {
    if value >= 1.0e9 {
        format!("${:.2}B", value / 1.0e9)
    } else {
        format!("${:.2}M", value / 1.0e6)
    }
}

/// The most recent `limit` bars, newest first, for the recent-data table.
pub fn recent_bars(bars: &[Bar], limit: usize) -> Vec<&Bar> {
    bars.iter().rev().take(limit).collect()
}
