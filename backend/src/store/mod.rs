//! Persistence interface for inventory data
//!
//! Services receive an `Arc<dyn InventoryStore>` instead of reaching for a
//! process-wide database handle, so tests can swap in [`MemoryStore`].

mod memory;
mod postgres;

pub use memory::{MemoryStore, StoreOp};
pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::{Inventory, Product, SalesWindow, Supplier, Warehouse};
use thiserror::Error;

/// Persistence failures surfaced to services
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store is unreachable or a query failed
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// An insert collided with a unique key; carries the offending field
    #[error("unique constraint violated on {0}")]
    UniqueViolation(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A validated product ready to be inserted with its opening stock
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub sku: String,
    pub price: Decimal,
    pub low_stock_threshold: Option<i32>,
    pub warehouse_id: i64,
    pub initial_quantity: i32,
}

/// Read and write access to the inventory tables.
///
/// List operations return rows in insertion (id) order.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Cheap round trip to confirm the store answers
    async fn ping(&self) -> StoreResult<()>;

    async fn warehouses_for_company(&self, company_id: i64) -> StoreResult<Vec<Warehouse>>;

    async fn inventory_for_warehouse(&self, warehouse_id: i64) -> StoreResult<Vec<Inventory>>;

    async fn find_product(&self, product_id: i64) -> StoreResult<Option<Product>>;

    async fn find_product_by_sku(&self, sku: &str) -> StoreResult<Option<Product>>;

    async fn find_warehouse(&self, warehouse_id: i64) -> StoreResult<Option<Warehouse>>;

    /// Count and total quantity of sales for the pair at or after `since`
    async fn sales_since(
        &self,
        product_id: i64,
        warehouse_id: i64,
        since: DateTime<Utc>,
    ) -> StoreResult<SalesWindow>;

    /// The associated supplier with the lowest id, if any
    async fn first_supplier_for_product(&self, product_id: i64) -> StoreResult<Option<Supplier>>;

    /// Insert the product and its inventory row atomically
    async fn create_product_with_inventory(&self, product: NewProduct) -> StoreResult<Product>;
}
