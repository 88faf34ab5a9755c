//! Business logic services for the StockWatch server

pub mod alerts;
pub mod product;
pub mod snapshot;

pub use alerts::LowStockAlertService;
pub use product::ProductService;
pub use snapshot::InventorySnapshotReader;
