//! # chips-ledger
//!
//! Broker-ledger ingestion and aggregation for Taiwan-market "chips" data.
//!
//! ## Architecture
//!
//! ```text
//! ArchiveResolver ──► locator ──► decoder ──► parser ──► aggregator ──► ResultSet
//!   (per-date zip)   (entry path)  (Big5/UTF-8) (records)   (per broker)
//! ```
//!
//! [`engine::QueryEngine`] runs that pipeline for every trading date of a
//! query with bounded concurrency; [`session::QuerySession`] wraps it in the
//! `Idle → Loading → Success | Error` lifecycle.
//!
//! ## Modules
//!
//! - [`archive`] — byte sources, opened archives, LRU cache, resolver
//! - [`locator`] — historical file-naming conventions
//! - [`decoder`] — Big5 with UTF-8 fallback
//! - [`parser`] — listed (double-column) and OTC ledger layouts
//! - [`aggregator`] — per-broker fold and finalization
//! - [`binning`] — chart dataset helpers (price histogram, concentration)
//! - [`upload`] — manually supplied CSV files

pub mod aggregator;
pub mod archive;
pub mod binning;
pub mod decoder;
pub mod engine;
pub mod locator;
pub mod parser;
pub mod session;
pub mod upload;

pub use aggregator::aggregate;
pub use engine::QueryEngine;
pub use session::QuerySession;
