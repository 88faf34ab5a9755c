//! Shared types and models for the StockWatch inventory platform
//!
//! This crate contains the domain entities, the low-stock alert records and
//! the pure arithmetic behind them, plus input validation rules.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::*;
