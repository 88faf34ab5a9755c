//! Route definitions for the StockWatch server

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/companies", company_routes())
        .nest("/products", product_routes())
}

/// Company-scoped routes
fn company_routes() -> Router<AppState> {
    Router::new().route(
        "/:company_id/alerts/low-stock",
        get(handlers::get_low_stock_alerts),
    )
}

/// Product catalog routes
fn product_routes() -> Router<AppState> {
    Router::new().route("/", post(handlers::create_product))
}
