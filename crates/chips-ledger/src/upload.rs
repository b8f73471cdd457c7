//! Manually supplied ledger files.
//!
//! A single CSV bypasses archive resolution but goes through the same
//! decode → parse → aggregate path. The stock code is the file name without
//! its extension.

use std::path::Path;

use chips_core::{ChipsError, ResultSet};
use tracing::info;

use crate::aggregator::aggregate;
use crate::decoder::{TextEncoding, decode};
use crate::parser::{LedgerLayout, parse_ledger_as};

/// Outcome of parsing an uploaded ledger.
#[derive(Debug, Clone)]
pub struct UploadResult {
    pub stock_code: String,
    pub encoding: TextEncoding,
    pub layout: LedgerLayout,
    pub result: ResultSet,
}

/// `2330.csv` → `2330`, `dir/6488_1141111.csv` → `6488_1141111`.
pub fn stock_code_from_filename(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string())
}

/// Parse uploaded bytes.
pub fn parse_upload_bytes(file_name: &str, bytes: &[u8]) -> Result<UploadResult, ChipsError> {
    let stock_code = stock_code_from_filename(file_name);
    let decoded = decode(bytes);
    let layout = LedgerLayout::sniff(&decoded.text);
    let records = parse_ledger_as(layout, &decoded.text);
    info!(
        file = file_name,
        stock = %stock_code,
        encoding = ?decoded.encoding,
        layout = ?layout,
        records = records.len(),
        "upload parsed"
    );

    Ok(UploadResult { stock_code, encoding: decoded.encoding, layout, result: aggregate(records)? })
}

/// Read and parse a ledger file from disk.
pub async fn parse_upload(path: &Path) -> Result<UploadResult, ChipsError> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    parse_upload_bytes(&file_name, &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_code_strips_extension() {
        assert_eq!(stock_code_from_filename("2330.csv"), "2330");
        assert_eq!(stock_code_from_filename("data/6488_1141111.csv"), "6488_1141111");
        assert_eq!(stock_code_from_filename("2330"), "2330");
    }

    #[test]
    fn big5_upload() {
        let text = "序號,券商,價格,買進股數,賣出股數\n\"1\",\"1040 臺銀證券\",\"56.50\",\"1000\",\"0\"\n";
        let (bytes, _, _) = encoding_rs::BIG5.encode(text);
        let up = parse_upload_bytes("6488.csv", &bytes).unwrap();
        assert_eq!(up.stock_code, "6488");
        assert_eq!(up.encoding, TextEncoding::Big5);
        assert_eq!(up.layout, LedgerLayout::Otc);
        assert_eq!(up.result.summary[0].broker, "1040 臺銀證券");
        assert_eq!(up.result.summary[0].net_volume, 1000);
    }

    #[test]
    fn header_only_upload_is_empty_result() {
        assert!(matches!(parse_upload_bytes("2330.csv", b"h1,h2,h3,h4,h5\n"), Err(ChipsError::EmptyResult)));
    }

    #[tokio::test]
    async fn upload_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2330.csv");
        std::fs::write(&path, "h1,h2,h3,h4,h5\n,BrokerA,10.5,100,50\n").unwrap();
        let up = parse_upload(&path).await.unwrap();
        assert_eq!(up.stock_code, "2330");
        assert_eq!(up.result.summary[0].net_volume, 50);
    }
}
