//! Low-stock alert models and stockout projection

use serde::{Deserialize, Serialize};

use super::{Inventory, Product, Supplier, Warehouse};

/// Trailing window used to decide whether a product is actively selling
pub const RECENCY_WINDOW_DAYS: i64 = 30;

/// Reported as `days_until_stockout` when there is no positive sales velocity
pub const STOCKOUT_UNKNOWN: i64 = -1;

/// Aggregated sales for one product in one warehouse over the recency window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesWindow {
    pub sale_count: i64,
    pub total_quantity: i64,
}

impl SalesWindow {
    pub fn new(sale_count: i64, total_quantity: i64) -> Self {
        Self {
            sale_count,
            total_quantity,
        }
    }

    /// At least one sale was recorded inside the window
    pub fn has_recent_sales(&self) -> bool {
        self.sale_count > 0
    }

    /// Average units sold per day over the window
    pub fn avg_daily_sales(&self) -> f64 {
        if self.total_quantity > 0 {
            self.total_quantity as f64 / RECENCY_WINDOW_DAYS as f64
        } else {
            0.0
        }
    }

    /// Whole days until `quantity` runs out at the current velocity.
    ///
    /// `quantity / (total / window)` is evaluated as `quantity * window / total`
    /// in integer arithmetic, which is the exact floor for non-negative inputs.
    pub fn days_until_stockout(&self, quantity: i32) -> i64 {
        if self.total_quantity <= 0 {
            return STOCKOUT_UNKNOWN;
        }
        i64::from(quantity) * RECENCY_WINDOW_DAYS / self.total_quantity
    }
}

/// Supplier block of an alert. All fields are null together when the
/// product has no registered supplier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertSupplier {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub contact_email: Option<String>,
}

impl From<Option<Supplier>> for AlertSupplier {
    fn from(supplier: Option<Supplier>) -> Self {
        match supplier {
            Some(s) => Self {
                id: Some(s.id),
                name: Some(s.name),
                contact_email: s.contact_email,
            },
            None => Self::default(),
        }
    }
}

/// A product/warehouse pair that is below threshold and still selling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockAlert {
    pub product_id: i64,
    pub product_name: String,
    pub sku: String,
    pub warehouse_id: i64,
    pub warehouse_name: String,
    pub current_stock: i32,
    pub threshold: i32,
    pub days_until_stockout: i64,
    pub supplier: AlertSupplier,
}

impl LowStockAlert {
    /// Assemble an alert from an eligible inventory row
    pub fn assemble(
        warehouse: &Warehouse,
        inventory: &Inventory,
        product: &Product,
        threshold: i32,
        sales: &SalesWindow,
        supplier: Option<Supplier>,
    ) -> Self {
        Self {
            product_id: product.id,
            product_name: product.name.clone(),
            sku: product.sku.clone(),
            warehouse_id: warehouse.id,
            warehouse_name: warehouse.name.clone(),
            current_stock: inventory.quantity,
            threshold,
            days_until_stockout: sales.days_until_stockout(inventory.quantity),
            supplier: supplier.into(),
        }
    }
}

/// Response body of the low-stock alerts endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockAlertsResponse {
    pub alerts: Vec<LowStockAlert>,
    pub total_alerts: usize,
}

impl From<Vec<LowStockAlert>> for LowStockAlertsResponse {
    fn from(alerts: Vec<LowStockAlert>) -> Self {
        let total_alerts = alerts.len();
        Self {
            alerts,
            total_alerts,
        }
    }
}
