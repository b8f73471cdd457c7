//! Query engine — runs the ledger pipeline over every date of a query.
//!
//! # Architecture
//!
//! ```text
//! StockQuery ──► validate ──► date index ∩ range ──► per-date task (≤ batch_size in flight)
//!                                                     resolve ─► locate ─► decode ─► parse
//!            ◄── aggregate ◄── concat (date order) ◄──┘
//! ```
//!
//! Per-date failures are logged and skipped; only a query that yields no
//! records at all fails with [`ChipsError::EmptyResult`].

use std::sync::Arc;

use chips_core::config::DEFAULT_BATCH_SIZE;
use chips_core::dates::{select_range, sort_desc};
use chips_core::{ChipsError, ResultSet, StockQuery, TradeRecord};
use futures_util::stream::{self, StreamExt};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::aggregator::aggregate;
use crate::archive::ArchiveResolver;
use crate::decoder::decode;
use crate::locator::locate;
use crate::parser::{LedgerLayout, parse_ledger_as};

/// Runs queries against one archive resolver.
pub struct QueryEngine {
    resolver: Arc<ArchiveResolver>,
    batch_size: usize,
    date_index: OnceCell<Vec<String>>,
}

impl QueryEngine {
    pub fn new(resolver: Arc<ArchiveResolver>, batch_size: usize) -> Self {
        Self { resolver, batch_size: batch_size.max(1), date_index: OnceCell::new() }
    }

    pub fn with_default_batch(resolver: Arc<ArchiveResolver>) -> Self {
        Self::new(resolver, DEFAULT_BATCH_SIZE)
    }

    pub fn resolver(&self) -> &Arc<ArchiveResolver> {
        &self.resolver
    }

    /// The date index, newest first. Fetched once per engine.
    pub async fn date_index(&self) -> Result<&[String], ChipsError> {
        let index = self
            .date_index
            .get_or_try_init(|| async {
                let mut dates = self.resolver.fetch_date_index().await?;
                sort_desc(&mut dates);
                info!(count = dates.len(), newest = dates.first().map(String::as_str), "date index loaded");
                Ok::<_, ChipsError>(dates)
            })
            .await?;
        Ok(index.as_slice())
    }

    /// Run a query end to end.
    pub async fn run(&self, query: &StockQuery) -> Result<ResultSet, ChipsError> {
        query.validate()?;

        let dates = select_range(self.date_index().await?, &query.start_date, &query.end_date);
        if dates.is_empty() {
            return Err(ChipsError::NoTradingDates { start: query.start_date.clone(), end: query.end_date.clone() });
        }

        let stock = query.stock_code.as_str();
        let date_count = dates.len();
        let per_date: Vec<Vec<TradeRecord>> = stream::iter(dates)
            .map(|date| async move { self.load_date(&date, stock).await })
            .buffered(self.batch_size)
            .collect()
            .await;

        let hit_dates = per_date.iter().filter(|r| !r.is_empty()).count();
        let records: Vec<TradeRecord> = per_date.into_iter().flatten().collect();
        info!(
            stock,
            dates = date_count,
            hit_dates,
            records = records.len(),
            "query collected"
        );

        aggregate(records)
    }

    /// Records for one date; every per-date failure becomes an empty list.
    pub async fn load_date(&self, date: &str, stock: &str) -> Vec<TradeRecord> {
        match self.try_load_date(date, stock).await {
            Ok(records) => records,
            Err(e @ ChipsError::NotFound { .. }) => {
                debug!(date, stock, "{e}");
                Vec::new()
            }
            Err(e) => {
                warn!(date, stock, "skipping date: {e}");
                Vec::new()
            }
        }
    }

    /// Records for one date, surfacing the per-date error.
    pub async fn try_load_date(&self, date: &str, stock: &str) -> Result<Vec<TradeRecord>, ChipsError> {
        let handle = self.resolver.resolve(date).await?;
        let ledger = locate(&handle, date, stock)?;
        let decoded = decode(&ledger.bytes);
        let layout = LedgerLayout::sniff(&decoded.text);
        let records = parse_ledger_as(layout, &decoded.text);
        debug!(
            date,
            path = %ledger.path,
            encoding = ?decoded.encoding,
            layout = ?layout,
            records = records.len(),
            "ledger parsed"
        );
        Ok(records)
    }
}
