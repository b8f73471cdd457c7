//! Ledger locator — finds a stock's file inside a per-date archive.
//!
//! Upstream publishers changed file naming over time and between the listed
//! and OTC segments. Candidates are tried in a fixed order and the first
//! existing entry wins:
//!
//! 1. `{date}/{stock}.csv`
//! 2. `{date}/{stock}_{date}.csv`
//! 3. `{date}/{stock}_{roc}.csv`
//! 4. `{stock}_{roc}.csv`
//! 5. `{stock}_{date}.csv`

use chips_core::ChipsError;
use chips_core::dates::roc_date;

use crate::archive::ArchiveHandle;

/// A ledger entry found in an archive.
#[derive(Debug, Clone)]
pub struct LocatedLedger {
    pub path: String,
    pub bytes: Vec<u8>,
}

/// Candidate entry paths in priority order.
///
/// ROC-dated candidates are left out when `date` has no ROC form.
pub fn candidate_paths(date: &str, stock: &str) -> Vec<String> {
    let roc = roc_date(date);
    let mut paths = Vec::with_capacity(5);
    paths.push(format!("{date}/{stock}.csv"));
    paths.push(format!("{date}/{stock}_{date}.csv"));
    if let Some(roc) = &roc {
        paths.push(format!("{date}/{stock}_{roc}.csv"));
        paths.push(format!("{stock}_{roc}.csv"));
    }
    paths.push(format!("{stock}_{date}.csv"));
    paths
}

/// Find and read the ledger for `stock` on `date`.
pub fn locate(handle: &ArchiveHandle, date: &str, stock: &str) -> Result<LocatedLedger, ChipsError> {
    for path in candidate_paths(date, stock) {
        if let Some(bytes) = handle.read(&path)? {
            return Ok(LocatedLedger { path, bytes });
        }
    }
    Err(ChipsError::NotFound { stock: stock.to_string(), date: date.to_string() })
}
