//! Per-broker aggregation.
//!
//! Records are folded into an insertion-ordered broker table, derived fields
//! are computed once in a finalization pass, and the table is stable-sorted
//! by net volume (ties keep first-seen order).

use ahash::AHashMap;
use chips_core::{BrokerSummary, ChipsError, ResultSet, TradeRecord};

/// Fold, finalize and sort. Output is a pure function of the record order.
pub fn summarize(records: &[TradeRecord]) -> Vec<BrokerSummary> {
    let mut index: AHashMap<&str, usize> = AHashMap::new();
    let mut summary: Vec<BrokerSummary> = Vec::new();

    for record in records {
        let slot = *index.entry(record.broker.as_str()).or_insert_with(|| {
            summary.push(BrokerSummary::new(record.broker.as_str()));
            summary.len() - 1
        });
        summary[slot].fold(record);
    }

    for entry in &mut summary {
        entry.finalize();
    }

    summary.sort_by(|a, b| b.net_volume.cmp(&a.net_volume));
    summary
}

/// Aggregate a query's records. Empty input is [`ChipsError::EmptyResult`].
pub fn aggregate(records: Vec<TradeRecord>) -> Result<ResultSet, ChipsError> {
    if records.is_empty() {
        return Err(ChipsError::EmptyResult);
    }
    let summary = summarize(&records);
    Ok(ResultSet { details: records, summary })
}
