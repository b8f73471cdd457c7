//! Chart dataset helpers built on top of a [`ResultSet`].
//!
//! - [`price_histogram`] — buy/sell volume per fixed-width price bin
//! - [`concentration`] — top-N net buyers versus top-N net sellers
//!
//! [`ResultSet`]: chips_core::ResultSet

use std::collections::BTreeMap;

use chips_core::{BrokerSummary, ChipsError, TradeRecord};
use serde::Serialize;

/// One fixed-width price bin `[lower, upper)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBin {
    pub lower: f64,
    pub upper: f64,
    pub buy_volume: u64,
    pub sell_volume: u64,
}

/// Bin trade records by price, ascending. Empty bins are omitted.
///
/// Records whose bin index does not fit an `i64` are left out.
pub fn price_histogram(details: &[TradeRecord], bin_width: f64) -> Result<Vec<PriceBin>, ChipsError> {
    if !(bin_width.is_finite() && bin_width > 0.0) {
        return Err(ChipsError::InvalidQuery(format!("bin width must be positive, got {bin_width}")));
    }

    let mut bins: BTreeMap<i64, (u64, u64)> = BTreeMap::new();
    for r in details {
        let Some(key) = bin_index(r.price, bin_width) else {
            continue;
        };
        let bin = bins.entry(key).or_insert((0, 0));
        bin.0 = bin.0.saturating_add(r.buy_volume);
        bin.1 = bin.1.saturating_add(r.sell_volume);
    }

    Ok(bins
        .into_iter()
        .map(|(key, (buy_volume, sell_volume))| {
            let lower = key as f64 * bin_width;
            PriceBin { lower, upper: lower + bin_width, buy_volume, sell_volume }
        })
        .collect())
}

#[inline]
fn bin_index(price: f64, bin_width: f64) -> Option<i64> {
    let index = (price / bin_width).floor();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range.
    (index.is_finite() && index >= i64::MIN as f64 && index < i64::MAX as f64).then_some(index as i64)
}

/// Dealer concentration of a summary set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Concentration {
    pub top_n: usize,
    /// Net volume of the top-N net buyers.
    pub top_buy_volume: u64,
    /// Absolute net volume of the top-N net sellers.
    pub top_sell_volume: u64,
    /// Sum of every broker's buy volume.
    pub total_volume: u64,
    /// `(top_buy - top_sell) / total_volume`, 0 without volume.
    pub ratio: f64,
}

/// Compute concentration from a summary sorted descending by net volume.
pub fn concentration(summary: &[BrokerSummary], top_n: usize) -> Concentration {
    let top_buy_volume: u64 = summary
        .iter()
        .take_while(|s| s.net_volume > 0)
        .take(top_n)
        .fold(0u64, |acc, s| acc.saturating_add(s.net_volume.unsigned_abs()));
    let top_sell_volume: u64 = summary
        .iter()
        .rev()
        .take_while(|s| s.net_volume < 0)
        .take(top_n)
        .fold(0u64, |acc, s| acc.saturating_add(s.net_volume.unsigned_abs()));
    let total_volume = summary.iter().fold(0u64, |acc, s| acc.saturating_add(s.buy_volume));
    let ratio = if total_volume > 0 {
        (top_buy_volume as f64 - top_sell_volume as f64) / total_volume as f64
    } else {
        0.0
    };
    Concentration { top_n, top_buy_volume, top_sell_volume, total_volume, ratio }
}
