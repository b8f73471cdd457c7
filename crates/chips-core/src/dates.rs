//! Trading-date utilities.
//!
//! All dates travel as `YYYYMMDD` strings, the same form used in archive and
//! ledger file names, so lexicographic order equals chronological order.

use chrono::{Datelike, NaiveDate};

use crate::error::ChipsError;

/// Offset between the Gregorian and Republic-of-China calendar years.
pub const ROC_YEAR_OFFSET: i32 = 1911;

/// Validate a `YYYYMMDD` string as a real calendar date.
pub fn parse_trading_date(date: &str) -> Result<NaiveDate, ChipsError> {
    if date.len() != 8 || !date.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ChipsError::InvalidQuery(format!("date must be YYYYMMDD, got {date:?}")));
    }
    NaiveDate::parse_from_str(date, "%Y%m%d")
        .map_err(|e| ChipsError::InvalidQuery(format!("invalid date {date}: {e}")))
}

/// Format a calendar date as `YYYYMMDD`.
pub fn format_trading_date(date: NaiveDate) -> String {
    format!("{:04}{:02}{:02}", date.year(), date.month(), date.day())
}

/// Reinterpret a `YYYYMMDD` date as an ROC calendar string.
///
/// `(year - 1911)` is concatenated with the original month-day substring, so
/// `20251111` becomes `1141111`. No calendar validation is applied; `None`
/// only when the string is too short or the year is not numeric.
pub fn roc_date(date: &str) -> Option<String> {
    if date.len() < 8 || !date.is_char_boundary(4) {
        return None;
    }
    let (year, month_day) = date.split_at(4);
    let year: i32 = year.parse().ok()?;
    Some(format!("{}{}", year - ROC_YEAR_OFFSET, month_day))
}

/// Sort a date index descending (newest first), dropping duplicates.
pub fn sort_desc(dates: &mut Vec<String>) {
    dates.sort_by(|a, b| b.cmp(a));
    dates.dedup();
}

/// Select the index dates inside `[start, end]`, oldest first.
///
/// Entries that are not valid `YYYYMMDD` dates are ignored.
pub fn select_range(index: &[String], start: &str, end: &str) -> Vec<String> {
    let mut selected: Vec<String> = index
        .iter()
        .filter(|d| d.as_str() >= start && d.as_str() <= end)
        .filter(|d| parse_trading_date(d).is_ok())
        .cloned()
        .collect();
    selected.sort();
    selected.dedup();
    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_and_invalid() {
        assert_eq!(
            parse_trading_date("20251111").unwrap(),
            NaiveDate::from_ymd_opt(2025, 11, 11).unwrap()
        );
        assert!(parse_trading_date("20250230").is_err());
        assert!(parse_trading_date("2025-11-11").is_err());
        assert!(parse_trading_date("251111").is_err());
    }

    #[test]
    fn format_round_trips_leading_zeros() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(format_trading_date(d), "20240105");
    }

    #[test]
    fn roc_conversion() {
        assert_eq!(roc_date("20251111").as_deref(), Some("1141111"));
        assert_eq!(roc_date("20100105").as_deref(), Some("990105"));
        assert_eq!(roc_date("2025"), None);
        assert_eq!(roc_date("abcd1111"), None);
    }

    #[test]
    fn sort_desc_newest_first() {
        let mut idx = vec!["20250102".to_string(), "20250105".into(), "20250103".into(), "20250105".into()];
        sort_desc(&mut idx);
        assert_eq!(idx, vec!["20250105", "20250103", "20250102"]);
    }

    #[test]
    fn select_range_inclusive_oldest_first() {
        let idx: Vec<String> = ["20250106", "20250105", "20250103", "20250102", "junk"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(select_range(&idx, "20250103", "20250105"), vec!["20250103", "20250105"]);
        assert!(select_range(&idx, "20250201", "20250228").is_empty());
    }
}
