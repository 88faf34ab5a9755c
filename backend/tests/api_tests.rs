//! HTTP API tests
//!
//! Drives the router end to end against an in-memory store.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use stockwatch_backend::config::{
    AlertsConfig, Config, DatabaseConfig, FailurePolicy, ServerConfig,
};
use stockwatch_backend::store::{MemoryStore, StoreOp};
use stockwatch_backend::{create_app, AppState};
use tower::ServiceExt;

fn test_config() -> Config {
    Config {
        environment: "test".to_string(),
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "postgres://localhost/unused".to_string(),
            max_connections: 4,
            min_connections: 1,
            acquire_timeout_secs: 5,
        },
        alerts: AlertsConfig {
            failure_policy: FailurePolicy::FailFast,
            max_concurrency: 4,
        },
    }
}

fn app(store: Arc<MemoryStore>) -> Router {
    create_app(AppState {
        store,
        config: Arc::new(test_config()),
    })
}

/// Company with one low-stock, recently sold product; returns (store, company_id, warehouse_id)
fn seeded_store() -> (Arc<MemoryStore>, i64, i64) {
    let store = Arc::new(MemoryStore::new());
    let company = store.add_company("Acme Retail");
    let warehouse = store.add_warehouse(company.id, "Main Warehouse");
    let product = store.add_product("Widget A", "WID-001", Decimal::new(1999, 2), Some(20));
    store.add_inventory(product.id, warehouse.id, 5);
    store.record_sale(product.id, warehouse.id, 30, Utc::now() - Duration::days(3));
    let supplier = store.add_supplier("Supplier Corp", Some("orders@supplier.com"));
    store.link_supplier(supplier.id, product.id);
    (store, company.id, warehouse.id)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_low_stock_alerts_json() {
    let (store, company_id, warehouse_id) = seeded_store();

    let response = app(store)
        .oneshot(
            Request::builder()
                .uri(format!("/api/companies/{}/alerts/low-stock", company_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total_alerts"], 1);

    let alert = &body["alerts"][0];
    assert_eq!(alert["sku"], "WID-001");
    assert_eq!(alert["product_name"], "Widget A");
    assert_eq!(alert["warehouse_id"], warehouse_id);
    assert_eq!(alert["warehouse_name"], "Main Warehouse");
    assert_eq!(alert["current_stock"], 5);
    assert_eq!(alert["threshold"], 20);
    assert_eq!(alert["days_until_stockout"], 5);
    assert_eq!(alert["supplier"]["name"], "Supplier Corp");
    assert_eq!(alert["supplier"]["contact_email"], "orders@supplier.com");
}

#[tokio::test]
async fn test_unknown_company_returns_empty_list() {
    let (store, _, _) = seeded_store();

    let response = app(store)
        .oneshot(
            Request::builder()
                .uri("/api/companies/424242/alerts/low-stock")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "alerts": [], "total_alerts": 0 })
    );
}

#[tokio::test]
async fn test_low_stock_alerts_csv() {
    let (store, company_id, _) = seeded_store();

    let response = app(store)
        .oneshot(
            Request::builder()
                .uri(format!(
                    "/api/companies/{}/alerts/low-stock?format=csv",
                    company_id
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("product_id,product_name,sku,warehouse_id,warehouse_name,current_stock,threshold,days_until_stockout,supplier_id,supplier_name,supplier_contact_email")
    );
    let row = lines.next().unwrap();
    assert!(row.contains("WID-001"));
    assert!(row.ends_with("Supplier Corp,orders@supplier.com"));
    assert_eq!(lines.next(), None);
}

#[tokio::test]
async fn test_storage_failure_is_service_unavailable() {
    let (store, company_id, _) = seeded_store();
    store.fail(StoreOp::Sales);

    let response = app(store)
        .oneshot(
            Request::builder()
                .uri(format!("/api/companies/{}/alerts/low-stock", company_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "STORAGE_UNAVAILABLE");
}

#[tokio::test]
async fn test_non_numeric_company_id_is_rejected() {
    let (store, _, _) = seeded_store();

    let response = app(store)
        .oneshot(
            Request::builder()
                .uri("/api/companies/acme/alerts/low-stock")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

fn post_product(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/products")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_create_product_endpoint() {
    let (store, _, warehouse_id) = seeded_store();
    let app = app(store);

    let request = json!({
        "name": "Gadget B",
        "sku": "GAD-002",
        "price": "4.50",
        "warehouse_id": warehouse_id,
        "initial_quantity": 12,
        "low_stock_threshold": 5
    });

    let response = app.clone().oneshot(post_product(request.clone())).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Product created");
    assert!(body["product_id"].is_i64());

    // Same SKU again
    let response = app.oneshot(post_product(request)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "DUPLICATE_ENTRY");
}

#[tokio::test]
async fn test_create_product_validation_error() {
    let (store, _, warehouse_id) = seeded_store();

    let response = app(store)
        .oneshot(post_product(json!({
            "name": "Gadget B",
            "sku": "GAD-002",
            "price": "4.50",
            "warehouse_id": warehouse_id,
            "initial_quantity": -3
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["field"], "initial_quantity");
}

#[tokio::test]
async fn test_create_product_missing_field_is_validation_error() {
    let (store, _, warehouse_id) = seeded_store();

    let response = app(store)
        .oneshot(post_product(json!({
            "name": "Gadget B",
            "sku": "GAD-002",
            "price": "4.50",
            "warehouse_id": warehouse_id
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["field"], "initial_quantity");
}

#[tokio::test]
async fn test_create_product_malformed_body_is_validation_error() {
    let (store, _, _) = seeded_store();

    let request = Request::builder()
        .method("POST")
        .uri("/api/products")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let response = app(store).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["field"], "body");
}

#[tokio::test]
async fn test_health_reports_store_status() {
    let (store, _, _) = seeded_store();
    store.fail(StoreOp::Ping);

    let response = app(store)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["store"]["reachable"], false);
    assert!(body["store"]["error"]
        .as_str()
        .unwrap()
        .contains("store unavailable"));
}

#[tokio::test]
async fn test_health_ok_when_store_answers() {
    let (store, _, _) = seeded_store();

    let response = app(store)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"]["reachable"], true);
    assert!(body["store"].get("error").is_none());
}
