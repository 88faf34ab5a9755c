//! PostgreSQL-backed inventory store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::{Inventory, Product, SalesWindow, Supplier, Warehouse};
use sqlx::{FromRow, PgPool};

use super::{InventoryStore, NewProduct, StoreError, StoreResult};

/// Inventory store over a pooled Postgres connection.
/// Each query checks a connection out of the pool.
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

/// Row for product queries
#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    sku: String,
    price: Decimal,
    low_stock_threshold: Option<i32>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            sku: row.sku,
            price: row.price,
            low_stock_threshold: row.low_stock_threshold,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let field = match db_err.constraint() {
                    Some(c) if c.contains("sku") => "sku".to_string(),
                    Some(c) => c.to_string(),
                    None => "key".to_string(),
                };
                return StoreError::UniqueViolation(field);
            }
        }
        StoreError::Unavailable(err.to_string())
    }
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl InventoryStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }

    async fn warehouses_for_company(&self, company_id: i64) -> StoreResult<Vec<Warehouse>> {
        let rows = sqlx::query_as::<_, (i64, i64, String)>(
            "SELECT id, company_id, name FROM warehouses WHERE company_id = $1 ORDER BY id",
        )
        .bind(company_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, company_id, name)| Warehouse {
                id,
                company_id,
                name,
            })
            .collect())
    }

    async fn inventory_for_warehouse(&self, warehouse_id: i64) -> StoreResult<Vec<Inventory>> {
        let rows = sqlx::query_as::<_, (i64, i64, i64, i32)>(
            r#"
            SELECT id, product_id, warehouse_id, quantity
            FROM inventory
            WHERE warehouse_id = $1
            ORDER BY id
            "#,
        )
        .bind(warehouse_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, product_id, warehouse_id, quantity)| Inventory {
                id,
                product_id,
                warehouse_id,
                quantity,
            })
            .collect())
    }

    async fn find_product(&self, product_id: i64) -> StoreResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, sku, price, low_stock_threshold FROM products WHERE id = $1",
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn find_product_by_sku(&self, sku: &str) -> StoreResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, sku, price, low_stock_threshold FROM products WHERE sku = $1",
        )
        .bind(sku)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn find_warehouse(&self, warehouse_id: i64) -> StoreResult<Option<Warehouse>> {
        let row = sqlx::query_as::<_, (i64, i64, String)>(
            "SELECT id, company_id, name FROM warehouses WHERE id = $1",
        )
        .bind(warehouse_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(|(id, company_id, name)| Warehouse {
            id,
            company_id,
            name,
        }))
    }

    async fn sales_since(
        &self,
        product_id: i64,
        warehouse_id: i64,
        since: DateTime<Utc>,
    ) -> StoreResult<SalesWindow> {
        let (sale_count, total_quantity) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT COUNT(*) AS sale_count,
                   COALESCE(SUM(quantity), 0)::BIGINT AS total_quantity
            FROM sales
            WHERE product_id = $1 AND warehouse_id = $2 AND "timestamp" >= $3
            "#,
        )
        .bind(product_id)
        .bind(warehouse_id)
        .bind(since)
        .fetch_one(&self.db)
        .await?;

        Ok(SalesWindow::new(sale_count, total_quantity))
    }

    async fn first_supplier_for_product(&self, product_id: i64) -> StoreResult<Option<Supplier>> {
        let row = sqlx::query_as::<_, (i64, String, Option<String>)>(
            r#"
            SELECT s.id, s.name, s.contact_email
            FROM suppliers s
            JOIN supplier_products sp ON sp.supplier_id = s.id
            WHERE sp.product_id = $1
            ORDER BY s.id
            LIMIT 1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(|(id, name, contact_email)| Supplier {
            id,
            name,
            contact_email,
        }))
    }

    async fn create_product_with_inventory(&self, product: NewProduct) -> StoreResult<Product> {
        // Dropping the transaction on an early return rolls both inserts back
        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (name, sku, price, low_stock_threshold)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, sku, price, low_stock_threshold
            "#,
        )
        .bind(&product.name)
        .bind(&product.sku)
        .bind(product.price)
        .bind(product.low_stock_threshold)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO inventory (product_id, warehouse_id, quantity) VALUES ($1, $2, $3)")
            .bind(row.id)
            .bind(product.warehouse_id)
            .bind(product.initial_quantity)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(row.into())
    }
}
