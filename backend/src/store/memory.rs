//! In-process inventory store
//!
//! Tables are insertion-ordered vectors with auto-incremented ids. Individual
//! operations can be marked unavailable to exercise storage failure paths.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::{Company, Inventory, Product, Sale, SalesWindow, Supplier, SupplierProduct, Warehouse};

use super::{InventoryStore, NewProduct, StoreError, StoreResult};

/// Store operations that can be failed on demand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Ping,
    Warehouses,
    Inventory,
    Products,
    Sales,
    Suppliers,
    /// The whole product creation write, before anything is inserted
    Writes,
    /// The inventory insert, after the product row is already in
    InventoryWrites,
}

#[derive(Default)]
struct Tables {
    next_id: i64,
    companies: Vec<Company>,
    warehouses: Vec<Warehouse>,
    products: Vec<Product>,
    inventory: Vec<Inventory>,
    suppliers: Vec<Supplier>,
    supplier_products: Vec<SupplierProduct>,
    sales: Vec<Sale>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Inventory store held entirely in memory
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    unavailable: Mutex<HashSet<StoreOp>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call of `op` fail with [`StoreError::Unavailable`]
    pub fn fail(&self, op: StoreOp) {
        self.unavailable
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(op);
    }

    /// Undo [`MemoryStore::fail`]
    pub fn restore(&self, op: StoreOp) {
        self.unavailable
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&op);
    }

    fn check(&self, op: StoreOp) -> StoreResult<()> {
        let unavailable = self.unavailable.lock().unwrap_or_else(PoisonError::into_inner);
        if unavailable.contains(&op) {
            return Err(StoreError::Unavailable(format!("{:?} is unavailable", op)));
        }
        Ok(())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_company(&self, name: &str) -> Company {
        let mut tables = self.write();
        let company = Company {
            id: tables.next_id(),
            name: name.to_string(),
        };
        tables.companies.push(company.clone());
        company
    }

    pub fn add_warehouse(&self, company_id: i64, name: &str) -> Warehouse {
        let mut tables = self.write();
        let warehouse = Warehouse {
            id: tables.next_id(),
            company_id,
            name: name.to_string(),
        };
        tables.warehouses.push(warehouse.clone());
        warehouse
    }

    pub fn add_product(
        &self,
        name: &str,
        sku: &str,
        price: Decimal,
        low_stock_threshold: Option<i32>,
    ) -> Product {
        let mut tables = self.write();
        let product = Product {
            id: tables.next_id(),
            name: name.to_string(),
            sku: sku.to_string(),
            price,
            low_stock_threshold,
        };
        tables.products.push(product.clone());
        product
    }

    /// Add an inventory row. Neither the product nor the warehouse is checked,
    /// so dangling references can be staged.
    pub fn add_inventory(&self, product_id: i64, warehouse_id: i64, quantity: i32) -> Inventory {
        let mut tables = self.write();
        let inventory = Inventory {
            id: tables.next_id(),
            product_id,
            warehouse_id,
            quantity,
        };
        tables.inventory.push(inventory.clone());
        inventory
    }

    pub fn add_supplier(&self, name: &str, contact_email: Option<&str>) -> Supplier {
        let mut tables = self.write();
        let supplier = Supplier {
            id: tables.next_id(),
            name: name.to_string(),
            contact_email: contact_email.map(str::to_string),
        };
        tables.suppliers.push(supplier.clone());
        supplier
    }

    pub fn link_supplier(&self, supplier_id: i64, product_id: i64) {
        let link = SupplierProduct {
            supplier_id,
            product_id,
        };
        let mut tables = self.write();
        if !tables.supplier_products.contains(&link) {
            tables.supplier_products.push(link);
        }
    }

    pub fn record_sale(
        &self,
        product_id: i64,
        warehouse_id: i64,
        quantity: i32,
        timestamp: DateTime<Utc>,
    ) -> Sale {
        let mut tables = self.write();
        let sale = Sale {
            id: tables.next_id(),
            product_id,
            warehouse_id,
            quantity,
            timestamp,
        };
        tables.sales.push(sale.clone());
        sale
    }

    /// Current quantity of every inventory row for a product, in insertion order
    pub fn stock_levels(&self, product_id: i64) -> Vec<Inventory> {
        self.read()
            .inventory
            .iter()
            .filter(|i| i.product_id == product_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        self.check(StoreOp::Ping)
    }

    async fn warehouses_for_company(&self, company_id: i64) -> StoreResult<Vec<Warehouse>> {
        self.check(StoreOp::Warehouses)?;
        Ok(self
            .read()
            .warehouses
            .iter()
            .filter(|w| w.company_id == company_id)
            .cloned()
            .collect())
    }

    async fn inventory_for_warehouse(&self, warehouse_id: i64) -> StoreResult<Vec<Inventory>> {
        self.check(StoreOp::Inventory)?;
        Ok(self
            .read()
            .inventory
            .iter()
            .filter(|i| i.warehouse_id == warehouse_id)
            .cloned()
            .collect())
    }

    async fn find_product(&self, product_id: i64) -> StoreResult<Option<Product>> {
        self.check(StoreOp::Products)?;
        Ok(self
            .read()
            .products
            .iter()
            .find(|p| p.id == product_id)
            .cloned())
    }

    async fn find_product_by_sku(&self, sku: &str) -> StoreResult<Option<Product>> {
        self.check(StoreOp::Products)?;
        Ok(self.read().products.iter().find(|p| p.sku == sku).cloned())
    }

    async fn find_warehouse(&self, warehouse_id: i64) -> StoreResult<Option<Warehouse>> {
        self.check(StoreOp::Warehouses)?;
        Ok(self
            .read()
            .warehouses
            .iter()
            .find(|w| w.id == warehouse_id)
            .cloned())
    }

    async fn sales_since(
        &self,
        product_id: i64,
        warehouse_id: i64,
        since: DateTime<Utc>,
    ) -> StoreResult<SalesWindow> {
        self.check(StoreOp::Sales)?;
        let tables = self.read();
        let (count, total) = tables
            .sales
            .iter()
            .filter(|s| {
                s.product_id == product_id && s.warehouse_id == warehouse_id && s.timestamp >= since
            })
            .fold((0i64, 0i64), |(count, total), s| {
                (count + 1, total + i64::from(s.quantity))
            });
        Ok(SalesWindow::new(count, total))
    }

    async fn first_supplier_for_product(&self, product_id: i64) -> StoreResult<Option<Supplier>> {
        self.check(StoreOp::Suppliers)?;
        let tables = self.read();
        let supplier = tables
            .supplier_products
            .iter()
            .filter(|link| link.product_id == product_id)
            .filter_map(|link| tables.suppliers.iter().find(|s| s.id == link.supplier_id))
            .min_by_key(|s| s.id)
            .cloned();
        Ok(supplier)
    }

    async fn create_product_with_inventory(&self, product: NewProduct) -> StoreResult<Product> {
        self.check(StoreOp::Writes)?;
        let mut tables = self.write();

        if tables.products.iter().any(|p| p.sku == product.sku) {
            return Err(StoreError::UniqueViolation("sku".to_string()));
        }

        // Same order as the Postgres transaction: product row, then inventory row
        let created = Product {
            id: tables.next_id(),
            name: product.name,
            sku: product.sku,
            price: product.price,
            low_stock_threshold: product.low_stock_threshold,
        };
        let rollback_len = tables.products.len();
        tables.products.push(created.clone());

        let inventory_insert = self.check(StoreOp::InventoryWrites).and_then(|()| {
            if tables.warehouses.iter().any(|w| w.id == product.warehouse_id) {
                Ok(())
            } else {
                Err(StoreError::Unavailable(format!(
                    "foreign key violation: warehouse {} does not exist",
                    product.warehouse_id
                )))
            }
        });
        if let Err(err) = inventory_insert {
            tables.products.truncate(rollback_len);
            return Err(err);
        }

        let inventory = Inventory {
            id: tables.next_id(),
            product_id: created.id,
            warehouse_id: product.warehouse_id,
            quantity: product.initial_quantity,
        };
        tables.inventory.push(inventory);

        Ok(created)
    }
}
