//! Supplier models

use serde::{Deserialize, Serialize};

/// A vendor that can restock products
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    pub contact_email: Option<String>,
}

/// Many-to-many link between suppliers and the products they carry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SupplierProduct {
    pub supplier_id: i64,
    pub product_id: i64,
}
