//! Typed error definitions for the broker-chips pipeline.
//!
//! Provides [`ChipsError`] for domain-specific errors. Per-date variants
//! ([`ChipsError::ArchiveUnavailable`], [`ChipsError::NotFound`]) are caught and
//! skipped by the query engine; only query-level variants reach the user.

use thiserror::Error;

/// Domain-specific errors for the broker-chips pipeline.
#[derive(Debug, Error)]
pub enum ChipsError {
    /// The archive for a date could not be fetched or opened.
    #[error("archive for {date} unavailable: {reason}")]
    ArchiveUnavailable { date: String, reason: String },

    /// No ledger entry matched any candidate path for this stock/date.
    #[error("no ledger for {stock} on {date}")]
    NotFound { stock: String, date: String },

    /// Zero trade records across the whole queried range.
    #[error("stock not found in range")]
    EmptyResult,

    /// The date index could not be fetched or parsed.
    #[error("date index unavailable: {0}")]
    DateIndexUnavailable(String),

    /// The date index holds no trading dates inside the requested range.
    #[error("no trading dates between {start} and {end}")]
    NoTradingDates { start: String, end: String },

    /// Malformed query parameters (stock code, dates, bin width).
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Configuration parsing or validation error.
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ChipsError {
    /// Whether this error only affects a single date of a multi-date query.
    pub fn is_per_date(&self) -> bool {
        matches!(self, ChipsError::ArchiveUnavailable { .. } | ChipsError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_message() {
        let e = ChipsError::EmptyResult;
        assert_eq!(e.to_string(), "stock not found in range");
        assert!(!e.is_per_date());
    }

    #[test]
    fn per_date_variants() {
        assert!(ChipsError::NotFound { stock: "2330".into(), date: "20251111".into() }.is_per_date());
        assert!(
            ChipsError::ArchiveUnavailable { date: "20251111".into(), reason: "404".into() }.is_per_date()
        );
    }
}
