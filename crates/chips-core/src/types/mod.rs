//! Core data types flowing through the ledger pipeline.

pub mod ledger;
pub mod query;

pub use ledger::*;
pub use query::*;
