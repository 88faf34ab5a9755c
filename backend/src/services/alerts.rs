//! Low-stock alert evaluation
//!
//! For every inventory row of a company, decides whether the row is low on
//! stock and still selling, projects the days left before it runs out, and
//! attaches a supplier to reorder from.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;
use shared::{LowStockAlert, LowStockAlertsResponse, RECENCY_WINDOW_DAYS};

use crate::config::FailurePolicy;
use crate::error::{AppError, AppResult};
use crate::services::snapshot::{InventorySnapshotReader, SnapshotEntry};
use crate::store::{InventoryStore, StoreResult};

/// Flattened alert for CSV export
#[derive(Debug, Serialize)]
struct AlertCsvRow<'a> {
    product_id: i64,
    product_name: &'a str,
    sku: &'a str,
    warehouse_id: i64,
    warehouse_name: &'a str,
    current_stock: i32,
    threshold: i32,
    days_until_stockout: i64,
    supplier_id: Option<i64>,
    supplier_name: Option<&'a str>,
    supplier_contact_email: Option<&'a str>,
}

impl<'a> From<&'a LowStockAlert> for AlertCsvRow<'a> {
    fn from(alert: &'a LowStockAlert) -> Self {
        Self {
            product_id: alert.product_id,
            product_name: &alert.product_name,
            sku: &alert.sku,
            warehouse_id: alert.warehouse_id,
            warehouse_name: &alert.warehouse_name,
            current_stock: alert.current_stock,
            threshold: alert.threshold,
            days_until_stockout: alert.days_until_stockout,
            supplier_id: alert.supplier.id,
            supplier_name: alert.supplier.name.as_deref(),
            supplier_contact_email: alert.supplier.contact_email.as_deref(),
        }
    }
}

/// Low-stock alert service
#[derive(Clone)]
pub struct LowStockAlertService {
    store: Arc<dyn InventoryStore>,
    snapshot: InventorySnapshotReader,
    policy: FailurePolicy,
    concurrency: usize,
}

impl LowStockAlertService {
    /// Create a service that evaluates rows one at a time and fails fast
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self {
            snapshot: InventorySnapshotReader::new(Arc::clone(&store)),
            store,
            policy: FailurePolicy::FailFast,
            concurrency: 1,
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Evaluate up to `concurrency` rows at once
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Compute the company's low-stock alerts as of now
    pub async fn low_stock_alerts(&self, company_id: i64) -> AppResult<LowStockAlertsResponse> {
        self.low_stock_alerts_at(company_id, Utc::now()).await
    }

    /// Compute the company's low-stock alerts as of `now`.
    ///
    /// Alerts come out in snapshot order (warehouse, then inventory row)
    /// whatever the concurrency.
    pub async fn low_stock_alerts_at(
        &self,
        company_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<LowStockAlertsResponse> {
        let since = now - Duration::days(RECENCY_WINDOW_DAYS);
        let entries = self.snapshot.read(company_id).await?;

        // Each evaluation owns its row and a handle on the service
        let evaluations = stream::iter(entries.clone())
            .map(|entry| {
                let service = self.clone();
                async move { service.evaluate(&entry, since).await }
            })
            .buffered(self.concurrency);

        let alerts: Vec<LowStockAlert> = match self.policy {
            FailurePolicy::FailFast => {
                let rows: Vec<Option<LowStockAlert>> = evaluations.try_collect().await?;
                rows.into_iter().flatten().collect()
            }
            FailurePolicy::BestEffort => {
                let results: Vec<StoreResult<Option<LowStockAlert>>> = evaluations.collect().await;
                results
                    .into_iter()
                    .zip(&entries)
                    .filter_map(|(result, entry)| match result {
                        Ok(alert) => alert,
                        Err(err) => {
                            tracing::error!(
                                company_id,
                                inventory_id = entry.inventory.id,
                                product_id = entry.product.id,
                                warehouse_id = entry.warehouse.id,
                                error = %err,
                                "Skipping inventory row after storage failure"
                            );
                            None
                        }
                    })
                    .collect()
            }
        };

        tracing::info!(
            company_id,
            candidates = entries.len(),
            alerts = alerts.len(),
            "Low-stock alerts evaluated"
        );

        Ok(alerts.into())
    }

    /// Evaluate a single inventory row against sales since `since`.
    ///
    /// Returns `Ok(None)` when the row is not an alert. Checks run in order
    /// and stop at the first that fails: threshold configured, quantity below
    /// threshold, at least one sale in the window.
    pub async fn evaluate(
        &self,
        entry: &SnapshotEntry,
        since: DateTime<Utc>,
    ) -> StoreResult<Option<LowStockAlert>> {
        let SnapshotEntry {
            warehouse,
            inventory,
            product,
        } = entry;

        let Some(threshold) = product.low_stock_threshold else {
            return Ok(None);
        };
        if inventory.quantity >= threshold {
            return Ok(None);
        }

        let sales = self
            .store
            .sales_since(product.id, warehouse.id, since)
            .await?;
        if !sales.has_recent_sales() {
            return Ok(None);
        }

        let supplier = self.store.first_supplier_for_product(product.id).await?;

        Ok(Some(LowStockAlert::assemble(
            warehouse, inventory, product, threshold, &sales, supplier,
        )))
    }

    /// Export alerts to CSV, one row per alert with the supplier inlined
    pub fn export_to_csv(alerts: &[LowStockAlert]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for alert in alerts {
            wtr.serialize(AlertCsvRow::from(alert))
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?,
        )
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}
