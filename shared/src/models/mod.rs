//! Domain models for the StockWatch inventory platform

mod alert;
mod company;
mod product;
mod sale;
mod supplier;

pub use alert::*;
pub use company::*;
pub use product::*;
pub use sale::*;
pub use supplier::*;
