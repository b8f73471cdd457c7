//! TWSE double-column ledger.
//!
//! After one header line, every line holds up to two broker entries:
//!
//! ```text
//! seq,broker,price,buy,sell,,seq,broker,price,buy,sell
//!  0    1      2    3    4  5  6    7      8    9   10
//! ```
//!
//! The left slot needs at least 5 fields, the right slot at least 11.

use chips_core::{ParsedRow, TradeRecord};

use super::fields::{lenient_price, lenient_volume, split_fields};

const LEFT_MIN_FIELDS: usize = 5;
const RIGHT_MIN_FIELDS: usize = 11;
const LEFT_OFFSET: usize = 1;
const RIGHT_OFFSET: usize = 7;

/// Parse a whole listed-market ledger.
pub fn parse(text: &str) -> Vec<TradeRecord> {
    text.lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .flat_map(parse_line)
        .filter_map(ParsedRow::into_record)
        .collect()
}

/// Validate both broker slots of one data line.
pub fn parse_line(line: &str) -> [ParsedRow; 2] {
    let fields = split_fields(line);
    let left = if fields.len() >= LEFT_MIN_FIELDS {
        slot(&fields, LEFT_OFFSET).map_or(ParsedRow::Skip, ParsedRow::Left)
    } else {
        ParsedRow::Skip
    };
    let right = if fields.len() >= RIGHT_MIN_FIELDS {
        slot(&fields, RIGHT_OFFSET).map_or(ParsedRow::Skip, ParsedRow::Right)
    } else {
        ParsedRow::Skip
    };
    [left, right]
}

/// Read `broker, price, buy, sell` starting at `offset`. Caller guarantees
/// `offset + 3` is in bounds.
fn slot(fields: &[&str], offset: usize) -> Option<TradeRecord> {
    let broker = fields[offset].trim();
    if broker.is_empty() {
        return None;
    }
    Some(TradeRecord {
        broker: broker.to_string(),
        price: lenient_price(fields[offset + 1]),
        buy_volume: lenient_volume(fields[offset + 2]),
        sell_volume: lenient_volume(fields[offset + 3]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(broker: &str, price: f64, buy: u64, sell: u64) -> TradeRecord {
        TradeRecord { broker: broker.into(), price, buy_volume: buy, sell_volume: sell }
    }

    #[test]
    fn header_only_yields_nothing() {
        assert!(parse("seq,broker,price,buy,sell").is_empty());
        assert!(parse("").is_empty());
    }

    #[test]
    fn four_fields_yield_nothing() {
        assert_eq!(parse_line("x,y,z,w"), [ParsedRow::Skip, ParsedRow::Skip]);
        assert!(parse("header\nx,y,z,w").is_empty());
    }

    #[test]
    fn both_slots() {
        let line = "1,1020 合庫,580.00,2000,0,,2,9200 凱基,581.00,0,3000";
        assert_eq!(
            parse_line(line),
            [ParsedRow::Left(rec("1020 合庫", 580.0, 2000, 0)), ParsedRow::Right(rec("9200 凱基", 581.0, 0, 3000))]
        );
    }

    #[test]
    fn right_slot_needs_eleven_fields() {
        let line = "1,A,10,1,2,,2,B,11,3";
        assert_eq!(parse_line(line), [ParsedRow::Left(rec("A", 10.0, 1, 2)), ParsedRow::Skip]);
    }

    #[test]
    fn empty_left_broker_keeps_right() {
        let line = ",  ,,,,,3,C,12.5,7,8";
        assert_eq!(parse_line(line), [ParsedRow::Skip, ParsedRow::Right(rec("C", 12.5, 7, 8))]);
    }

    #[test]
    fn malformed_numbers_become_zero() {
        let records = parse("h\n1,BrokerX,n/a,abc,\r\n\n   \n");
        assert_eq!(records, vec![rec("BrokerX", 0.0, 0, 0)]);
    }

    #[test]
    fn preserves_file_order() {
        let text = "h\n1,A,10,1,0,,2,B,10,0,1\n3,C,11,2,0";
        let brokers: Vec<_> = parse(text).into_iter().map(|r| r.broker).collect();
        assert_eq!(brokers, vec!["A", "B", "C"]);
    }
}
