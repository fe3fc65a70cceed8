//! # DuPont Analytics Engine
//!
//! This crate turns pivoted statement data into per-bank, per-period ratio
//! records and provides the read-side helpers the dashboard and CLI share.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** no I/O. Inputs are a `StatementPivot` or a slice of
//!   `FinancialRecord`s; outputs are plain values.
//! - **No panics on bad data:** every division is checked and an undefined
//!   ratio is `None`, never NaN or infinity.
//!
//! ## Public API
//!
//! - `RatioEngine`: DuPont, liquidity, coverage and capital ratios plus ROE tiers.
//! - `TierThresholds`: the ROE-quantile rule behind the reference labels.
//! - `RecordFilter` / `FilterOptions`: the dashboard's global filters.
//! - `average_roe_by_period`, `tier_distribution`: aggregated views.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod filter;
pub mod series;
pub mod tiers;

#[cfg(test)]
mod test_support;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{ratio, RatioEngine};
pub use error::AnalyticsError;
pub use filter::{FilterOptions, RecordFilter};
pub use series::{average_roe_by_period, tier_distribution, RoePoint, TierDistribution, TierSource};
pub use tiers::TierThresholds;
