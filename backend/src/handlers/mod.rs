//! HTTP handlers for the StockWatch server

pub mod alerts;
pub mod health;
pub mod product;

pub use alerts::*;
pub use health::*;
pub use product::*;
