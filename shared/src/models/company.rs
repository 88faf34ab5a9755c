//! Company and warehouse models

use serde::{Deserialize, Serialize};

/// A tenant on the platform; root of the warehouse ownership tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Company {
    pub id: i64,
    pub name: String,
}

/// A stocking location owned by exactly one company
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Warehouse {
    pub id: i64,
    pub company_id: i64,
    pub name: String,
}
