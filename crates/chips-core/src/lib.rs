//! # chips-core
//!
//! Core crate for the broker-chips system, providing:
//!
//! - **Types** (`types`) — trade records, broker summaries, queries, query states
//! - **Configuration** (`config`) — JSON config deserialization
//! - **Error types** (`error`) — domain-specific `ChipsError` via thiserror
//! - **Trading dates** (`dates`) — `YYYYMMDD` validation, ROC dates, range selection
//! - **Logging** (`logging`) — tracing-based structured logging

pub mod config;
pub mod dates;
pub mod error;
pub mod logging;
pub mod types;

// Re-export types at crate root for convenience.
pub use error::ChipsError;
pub use types::*;
