//! Product handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use shared::CreateProductInput;

use crate::error::AppResult;
use crate::services::product::{CreateProductResponse, ProductService};
use crate::AppState;

/// Create a product with its initial stock in one warehouse
///
/// Body rejections (missing fields, wrong types, bad JSON) surface as
/// 400 `VALIDATION_ERROR` like every other input problem.
pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<CreateProductInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CreateProductResponse>)> {
    let Json(input) = payload?;
    let service = ProductService::new(state.store.clone());
    let product = service.create_product(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateProductResponse {
            message: "Product created".to_string(),
            product_id: product.id,
        }),
    ))
}
