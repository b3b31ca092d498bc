//! # Export Module
//!
//! Flattens batch results into one row per `(file, compound, ion)` and
//! writes them as CSV or JSON. Column names follow the established result
//! table layout (`File`, `Ion (m/z)`, `Compound`, `RT (min)`, ...).
//! A [`RunSummary`] records fitted curves and failed units alongside.

mod error;
mod row;
mod summary;
mod writer;

pub use error::ExportError;
pub use row::ResultRow;
pub use summary::{FailureRecord, RunSummary};
pub use writer::{write_csv, write_json, write_results};

#[cfg(test)]
mod tests;
