//! TPEx (over-the-counter) ledger.
//!
//! The file starts with report metadata lines; data follows the column header
//! `序號,券商,價格,買進股數,賣出股數`. Cells are usually wrapped in double quotes.

use chips_core::{ParsedRow, TradeRecord};

use super::fields::{lenient_price, lenient_volume, split_fields, unquote};

/// Column header that starts the data section.
pub const OTC_HEADER: &str = "序號,券商,價格";

const MIN_FIELDS: usize = 5;

/// Parse a whole OTC ledger. Without a header line nothing is returned.
pub fn parse(text: &str) -> Vec<TradeRecord> {
    text.lines()
        .skip_while(|line| !is_header(line))
        .skip(1)
        .map(parse_line)
        .filter_map(ParsedRow::into_record)
        .collect()
}

/// Header match ignores quoting so `"序號","券商","價格"` also counts.
fn is_header(line: &str) -> bool {
    line.contains(OTC_HEADER) || line.replace('"', "").contains(OTC_HEADER)
}

/// Validate one data line.
pub fn parse_line(line: &str) -> ParsedRow {
    let fields: Vec<&str> = split_fields(line).into_iter().map(unquote).collect();
    if fields.len() < MIN_FIELDS {
        return ParsedRow::Skip;
    }
    let broker = fields[1].trim();
    if broker.is_empty() {
        return ParsedRow::Skip;
    }
    ParsedRow::Left(TradeRecord {
        broker: broker.to_string(),
        price: lenient_price(fields[2]),
        buy_volume: lenient_volume(fields[3]),
        sell_volume: lenient_volume(fields[4]),
    })
}
