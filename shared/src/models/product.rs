//! Product catalog and stock level models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A catalog entry. SKUs are unique across the platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub sku: String,
    pub price: Decimal,
    /// Stock level below which the product is considered low.
    /// `None` disables low-stock alerts for the product.
    pub low_stock_threshold: Option<i32>,
}

/// Quantity on hand of one product in one warehouse
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Inventory {
    pub id: i64,
    pub product_id: i64,
    pub warehouse_id: i64,
    pub quantity: i32,
}

/// Input for creating a product together with its initial stock
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProductInput {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,
    #[validate(
        length(min = 1, max = 64, message = "SKU must be between 1 and 64 characters"),
        custom = "crate::validation::validate_sku"
    )]
    pub sku: String,
    #[validate(custom = "crate::validation::validate_price")]
    pub price: Decimal,
    pub warehouse_id: i64,
    #[validate(range(min = 0, message = "Initial quantity cannot be negative"))]
    pub initial_quantity: i32,
    #[validate(range(min = 0, message = "Low stock threshold cannot be negative"))]
    pub low_stock_threshold: Option<i32>,
}
