//! Ledger data structures — trade records, broker summaries, result sets.
//!
//! [`TradeRecord`]s are produced by the parser and consumed by the
//! aggregator, which folds them into one [`BrokerSummary`] per broker.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Trade record (parser → aggregator)
// ---------------------------------------------------------------------------

/// One broker's activity at one price on one ledger line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    /// Free-text broker branch name (never empty).
    pub broker: String,
    /// Trade price for this ledger line.
    pub price: f64,
    /// Shares bought at `price`.
    pub buy_volume: u64,
    /// Shares sold at `price`.
    pub sell_volume: u64,
}

/// Outcome of validating one broker slot of a ledger row.
///
/// Listed-market rows carry two slots side by side; OTC rows only ever
/// produce `Left` or `Skip`.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedRow {
    Left(TradeRecord),
    Right(TradeRecord),
    Skip,
}

impl ParsedRow {
    pub fn into_record(self) -> Option<TradeRecord> {
        match self {
            ParsedRow::Left(r) | ParsedRow::Right(r) => Some(r),
            ParsedRow::Skip => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Broker summary (aggregator output)
// ---------------------------------------------------------------------------

/// Accumulated activity of one broker across the whole queried range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerSummary {
    pub broker: String,
    pub buy_volume: u64,
    pub sell_volume: u64,
    /// Sum of `price * buy_volume`, accumulated per record.
    pub buy_amount: f64,
    /// Sum of `price * sell_volume`, accumulated per record.
    pub sell_amount: f64,
    /// `buy_volume - sell_volume`; positive means net buyer.
    pub net_volume: i64,
    pub net_amount: f64,
    pub avg_buy_price: f64,
    pub avg_sell_price: f64,
}

impl BrokerSummary {
    /// Zeroed summary for a broker seen for the first time.
    pub fn new(broker: impl Into<String>) -> Self {
        Self {
            broker: broker.into(),
            buy_volume: 0,
            sell_volume: 0,
            buy_amount: 0.0,
            sell_amount: 0.0,
            net_volume: 0,
            net_amount: 0.0,
            avg_buy_price: 0.0,
            avg_sell_price: 0.0,
        }
    }

    /// Accumulate the raw sums of one record. Derived fields are untouched.
    ///
    /// Volume sums saturate at `u64::MAX`.
    #[inline]
    pub fn fold(&mut self, record: &TradeRecord) {
        self.buy_volume = self.buy_volume.saturating_add(record.buy_volume);
        self.sell_volume = self.sell_volume.saturating_add(record.sell_volume);
        self.buy_amount += record.buy_volume as f64 * record.price;
        self.sell_amount += record.sell_volume as f64 * record.price;
    }

    /// Compute net and average fields from the accumulated sums.
    pub fn finalize(&mut self) {
        let net = i128::from(self.buy_volume) - i128::from(self.sell_volume);
        self.net_volume = net.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64;
        self.net_amount = self.buy_amount - self.sell_amount;
        self.avg_buy_price = if self.buy_volume > 0 { self.buy_amount / self.buy_volume as f64 } else { 0.0 };
        self.avg_sell_price =
            if self.sell_volume > 0 { self.sell_amount / self.sell_volume as f64 } else { 0.0 };
    }
}

// ---------------------------------------------------------------------------
// Result set (aggregator → presentation)
// ---------------------------------------------------------------------------

/// Final output of a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    /// Every record collected for the query, in ingestion order.
    pub details: Vec<TradeRecord>,
    /// One entry per broker, sorted descending by `net_volume`.
    pub summary: Vec<BrokerSummary>,
}
