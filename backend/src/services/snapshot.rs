//! Inventory snapshot reader
//!
//! Enumerates every inventory row held in a company's warehouses together
//! with its warehouse and product.

use std::collections::HashMap;
use std::sync::Arc;

use shared::{Inventory, Product, Warehouse};

use crate::store::{InventoryStore, StoreResult};

/// One inventory row with the entities it references
#[derive(Debug, Clone)]
pub struct SnapshotEntry {
    pub warehouse: Arc<Warehouse>,
    pub inventory: Inventory,
    pub product: Arc<Product>,
}

/// Reads the (warehouse, inventory, product) triples of a company
#[derive(Clone)]
pub struct InventorySnapshotReader {
    store: Arc<dyn InventoryStore>,
}

impl InventorySnapshotReader {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    /// Load all inventory rows of the company's warehouses.
    ///
    /// Entries are ordered by warehouse, then by inventory row, as the store
    /// returns them. An unknown company yields an empty snapshot. Rows whose
    /// product no longer exists are logged and skipped.
    pub async fn read(&self, company_id: i64) -> StoreResult<Vec<SnapshotEntry>> {
        let warehouses = self.store.warehouses_for_company(company_id).await?;
        let mut products: HashMap<i64, Option<Arc<Product>>> = HashMap::new();
        let mut entries = Vec::new();

        for warehouse in warehouses {
            let warehouse = Arc::new(warehouse);
            let rows = self.store.inventory_for_warehouse(warehouse.id).await?;

            for inventory in rows {
                let product = match products.get(&inventory.product_id) {
                    Some(cached) => cached.clone(),
                    None => {
                        let found = self
                            .store
                            .find_product(inventory.product_id)
                            .await?
                            .map(Arc::new);
                        products.insert(inventory.product_id, found.clone());
                        found
                    }
                };

                let Some(product) = product else {
                    tracing::warn!(
                        inventory_id = inventory.id,
                        warehouse_id = warehouse.id,
                        product_id = inventory.product_id,
                        "Inventory row references a missing product, skipping"
                    );
                    continue;
                };

                entries.push(SnapshotEntry {
                    warehouse: Arc::clone(&warehouse),
                    inventory,
                    product,
                });
            }
        }

        tracing::debug!(company_id, rows = entries.len(), "Inventory snapshot loaded");
        Ok(entries)
    }
}
