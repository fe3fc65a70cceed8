//! # Statement Ingestion
//!
//! Turns the regulator's long-format export into a [`StatementPivot`] and
//! moves processed [`core_types::FinancialRecord`]s to and from flat CSV files.
//! This crate has no knowledge of ratios; it only reads, coerces and sums.

pub mod error;
pub mod pivot;
pub mod records;
pub mod statements;

pub use error::IngestError;
pub use pivot::StatementPivot;
pub use records::{read_records, read_records_from, write_records, write_records_to};
pub use statements::{load_statements, read_observations, IngestStats};
