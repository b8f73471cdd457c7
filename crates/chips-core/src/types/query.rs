//! Query parameters and the query lifecycle state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::ledger::ResultSet;
use crate::dates::parse_trading_date;
use crate::error::ChipsError;

/// A user query: one stock over an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockQuery {
    pub stock_code: String,
    /// Inclusive start, `YYYYMMDD`.
    pub start_date: String,
    /// Inclusive end, `YYYYMMDD`.
    pub end_date: String,
}

impl StockQuery {
    pub fn new(stock_code: impl Into<String>, start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            stock_code: stock_code.into().trim().to_string(),
            start_date: start_date.into().trim().to_string(),
            end_date: end_date.into().trim().to_string(),
        }
    }

    /// Single-day query.
    pub fn single_day(stock_code: impl Into<String>, date: impl Into<String>) -> Self {
        let date = date.into();
        Self::new(stock_code, date.clone(), date)
    }

    /// Check the stock code is non-empty and the range is a valid, ordered
    /// pair of calendar dates.
    pub fn validate(&self) -> Result<(), ChipsError> {
        if self.stock_code.is_empty() {
            return Err(ChipsError::InvalidQuery("stock code is empty".into()));
        }
        let start = parse_trading_date(&self.start_date)?;
        let end = parse_trading_date(&self.end_date)?;
        if start > end {
            return Err(ChipsError::InvalidQuery(format!(
                "start {} is after end {}",
                self.start_date, self.end_date
            )));
        }
        Ok(())
    }
}

/// Lifecycle of the most recently submitted query.
///
/// `generation` identifies the submission that produced the state; results of
/// superseded submissions are never published.
#[derive(Debug, Clone, Default)]
pub enum QueryState {
    #[default]
    Idle,
    Loading { generation: u64, query: StockQuery },
    Success { generation: u64, result: Arc<ResultSet> },
    Error { generation: u64, message: String },
}

impl QueryState {
    pub fn generation(&self) -> Option<u64> {
        match self {
            QueryState::Idle => None,
            QueryState::Loading { generation, .. }
            | QueryState::Success { generation, .. }
            | QueryState::Error { generation, .. } => Some(*generation),
        }
    }

    /// `Success` or `Error`.
    pub fn is_settled(&self) -> bool {
        matches!(self, QueryState::Success { .. } | QueryState::Error { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_ordered_range() {
        assert!(StockQuery::new(" 2330 ", "20251101", "20251111").validate().is_ok());
        assert!(StockQuery::single_day("2330", "20251111").validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_input() {
        assert!(StockQuery::new("", "20251101", "20251111").validate().is_err());
        assert!(StockQuery::new("2330", "20251111", "20251101").validate().is_err());
        assert!(StockQuery::new("2330", "2025111", "20251111").validate().is_err());
    }

    #[test]
    fn state_generation() {
        assert_eq!(QueryState::Idle.generation(), None);
        let s = QueryState::Error { generation: 3, message: "x".into() };
        assert_eq!(s.generation(), Some(3));
        assert!(s.is_settled());
    }
}
