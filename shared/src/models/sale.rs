//! Sales history models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded sale. Sales are append-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sale {
    pub id: i64,
    pub product_id: i64,
    pub warehouse_id: i64,
    pub quantity: i32,
    pub timestamp: DateTime<Utc>,
}
