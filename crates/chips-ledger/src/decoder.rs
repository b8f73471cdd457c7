//! Ledger text decoding.
//!
//! Upstream ledgers are mostly Big5 (the legacy Traditional Chinese code
//! page used by TWSE/TPEx exports). Newer files are UTF-8. Detection is a
//! heuristic: strict Big5 first, lossy UTF-8 on any malformed sequence.

use encoding_rs::BIG5;
use tracing::debug;

/// Which decoding path produced the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Big5,
    Utf8Fallback,
}

/// Decoded ledger text.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub text: String,
    pub encoding: TextEncoding,
}

/// Decode raw ledger bytes. Never fails.
pub fn decode(bytes: &[u8]) -> Decoded {
    if let Some(text) = BIG5.decode_without_bom_handling_and_without_replacement(bytes) {
        return Decoded { text: text.into_owned(), encoding: TextEncoding::Big5 };
    }

    debug!(len = bytes.len(), "big5 decode failed, falling back to utf-8");
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    Decoded { text: String::from_utf8_lossy(bytes).into_owned(), encoding: TextEncoding::Utf8Fallback }
}
