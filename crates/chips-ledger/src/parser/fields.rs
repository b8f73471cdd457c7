//! Field splitting and the lenient numeric policy shared by both layouts.
//!
//! Ledger cells are stringly typed. A malformed number never invalidates a
//! row: the broker identity is kept and the number becomes zero. Negative and
//! non-finite values are treated as malformed, and so are volumes above
//! [`MAX_VOLUME`].

/// Largest share volume a cell may carry; net volume is signed 64-bit.
pub const MAX_VOLUME: u64 = i64::MAX as u64;

/// Naive comma split. Quoted commas are not honoured.
#[inline]
pub fn split_fields(line: &str) -> Vec<&str> {
    line.split(',').collect()
}

/// Trim a cell and strip one pair of surrounding double quotes.
#[inline]
pub fn unquote(cell: &str) -> &str {
    let cell = cell.trim();
    cell.strip_prefix('"').and_then(|c| c.strip_suffix('"')).unwrap_or(cell)
}

/// Parse a price cell, `0.0` on failure.
#[inline]
pub fn lenient_price(cell: &str) -> f64 {
    match fast_float2::parse::<f64, _>(cell.trim()) {
        Ok(v) if v.is_finite() && v >= 0.0 => v,
        _ => 0.0,
    }
}

/// Parse a share-volume cell, `0` on failure.
///
/// Integers parse directly; a finite decimal is truncated.
#[inline]
pub fn lenient_volume(cell: &str) -> u64 {
    let cell = cell.trim();
    if let Ok(v) = cell.parse::<u64>() {
        return if v <= MAX_VOLUME { v } else { 0 };
    }
    match fast_float2::parse::<f64, _>(cell) {
        Ok(v) if v.is_finite() && v >= 0.0 && v < MAX_VOLUME as f64 => v.trunc() as u64,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unquote_strips_one_pair() {
        assert_eq!(unquote("\"56.50\""), "56.50");
        assert_eq!(unquote(" \"a\" "), "a");
        assert_eq!(unquote("\"\"x\"\""), "\"x\"");
        assert_eq!(unquote("\"open"), "\"open");
        assert_eq!(unquote("plain"), "plain");
    }

    #[test]
    fn price_leniency() {
        assert_eq!(lenient_price("10.5"), 10.5);
        assert_eq!(lenient_price(" 56.50 "), 56.5);
        assert_eq!(lenient_price(""), 0.0);
        assert_eq!(lenient_price("--"), 0.0);
        assert_eq!(lenient_price("-3"), 0.0);
        assert_eq!(lenient_price("inf"), 0.0);
    }

    #[test]
    fn volume_leniency() {
        assert_eq!(lenient_volume("1000"), 1000);
        assert_eq!(lenient_volume(" 50\r"), 50);
        assert_eq!(lenient_volume("12.9"), 12);
        assert_eq!(lenient_volume("abc"), 0);
        assert_eq!(lenient_volume("-5"), 0);
        assert_eq!(lenient_volume(""), 0);
    }

    #[test]
    fn volume_above_signed_range_is_malformed() {
        assert_eq!(lenient_volume("9223372036854775807"), MAX_VOLUME);
        assert_eq!(lenient_volume("9223372036854775808"), 0);
        assert_eq!(lenient_volume("18446744073709551615"), 0);
        assert_eq!(lenient_volume("1e19"), 0);
        assert_eq!(lenient_volume("1e30"), 0);
    }

    #[test]
    fn split_keeps_empty_cells() {
        assert_eq!(split_fields(",a,,b"), vec!["", "a", "", "b"]);
    }
}
