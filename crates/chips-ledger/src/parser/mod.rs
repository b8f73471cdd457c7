//! Ledger parsers.
//!
//! Two table layouts exist upstream:
//!
//! - [`listed`] — TWSE double-column ledger, two broker slots per line
//! - [`otc`] — TPEx ledger, one quoted broker slot per line after a column header
//!
//! The layout is sniffed from the decoded text. Parsing never fails: rows that
//! do not fit the schema are skipped and bad numeric cells become zero.

pub mod fields;
pub mod listed;
pub mod otc;

use chips_core::TradeRecord;

/// Title line of a TPEx broker ledger report.
pub const OTC_REPORT_TITLE: &str = "券商買賣證券成交價量資訊";

/// Ledger table layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerLayout {
    Listed,
    Otc,
}

impl LedgerLayout {
    /// Pick the layout from the decoded text.
    pub fn sniff(text: &str) -> Self {
        if text.contains(OTC_REPORT_TITLE) || text.contains(otc::OTC_HEADER) {
            LedgerLayout::Otc
        } else {
            LedgerLayout::Listed
        }
    }
}

/// Parse ledger text with a sniffed layout.
pub fn parse_ledger(text: &str) -> Vec<TradeRecord> {
    parse_ledger_as(LedgerLayout::sniff(text), text)
}

/// Parse ledger text with an explicit layout.
pub fn parse_ledger_as(layout: LedgerLayout, text: &str) -> Vec<TradeRecord> {
    match layout {
        LedgerLayout::Listed => listed::parse(text),
        LedgerLayout::Otc => otc::parse(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniff_layouts() {
        assert_eq!(LedgerLayout::sniff("h1,h2,h3,h4,h5\n,BrokerA,10.5,100,50"), LedgerLayout::Listed);
        assert_eq!(LedgerLayout::sniff("券商買賣證券成交價量資訊\n證券代碼,6488"), LedgerLayout::Otc);
        assert_eq!(LedgerLayout::sniff("序號,券商,價格,買進股數,賣出股數"), LedgerLayout::Otc);
    }

    #[test]
    fn end_to_end_listed() {
        let records = parse_ledger("h1,h2,h3,h4,h5\n,BrokerA,10.5,100,50");
        assert_eq!(
            records,
            vec![TradeRecord { broker: "BrokerA".into(), price: 10.5, buy_volume: 100, sell_volume: 50 }]
        );
    }

    #[test]
    fn end_to_end_otc() {
        let text = "序號,券商,價格,買進股數,賣出股數\n\
                    \"1\",\"1040 臺銀證券\",\"56.50\",\"1000\",\"0\"";
        let records = parse_ledger(text);
        assert_eq!(
            records,
            vec![TradeRecord { broker: "1040 臺銀證券".into(), price: 56.5, buy_volume: 1000, sell_volume: 0 }]
        );
    }
}
