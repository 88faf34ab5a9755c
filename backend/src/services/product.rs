//! Product catalog service

use std::sync::Arc;

use serde::Serialize;
use shared::{CreateProductInput, Product};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::store::{InventoryStore, NewProduct};

/// Product service for creating catalog entries with opening stock
#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn InventoryStore>,
}

/// Response for a created product
#[derive(Debug, Serialize)]
pub struct CreateProductResponse {
    pub message: String,
    pub product_id: i64,
}

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    /// Create a product and its initial inventory row in one transaction
    pub async fn create_product(&self, input: CreateProductInput) -> AppResult<Product> {
        input.validate()?;

        // SKUs are unique platform-wide
        if self.store.find_product_by_sku(&input.sku).await?.is_some() {
            return Err(AppError::DuplicateEntry("sku".to_string()));
        }

        if self.store.find_warehouse(input.warehouse_id).await?.is_none() {
            return Err(AppError::NotFound("Warehouse".to_string()));
        }

        let product = self
            .store
            .create_product_with_inventory(NewProduct {
                name: input.name,
                sku: input.sku,
                price: input.price,
                low_stock_threshold: input.low_stock_threshold,
                warehouse_id: input.warehouse_id,
                initial_quantity: input.initial_quantity,
            })
            .await?;

        tracing::info!(
            product_id = product.id,
            sku = %product.sku,
            warehouse_id = input.warehouse_id,
            "Product created"
        );

        Ok(product)
    }
}
