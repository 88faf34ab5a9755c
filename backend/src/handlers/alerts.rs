//! Low-stock alert handlers

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::services::LowStockAlertService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AlertsQuery {
    pub format: Option<String>, // "json" or "csv"
}

/// Get low-stock alerts for every warehouse of a company.
/// An unknown company yields an empty list rather than 404.
pub async fn get_low_stock_alerts(
    State(state): State<AppState>,
    Path(company_id): Path<i64>,
    Query(query): Query<AlertsQuery>,
) -> AppResult<impl IntoResponse> {
    let service = LowStockAlertService::new(state.store.clone())
        .with_failure_policy(state.config.alerts.failure_policy)
        .with_concurrency(state.config.alert_concurrency());

    let response = service.low_stock_alerts(company_id).await?;

    if query.format.as_deref() == Some("csv") {
        let csv = LowStockAlertService::export_to_csv(&response.alerts)?;
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"low_stock_alerts.csv\"",
                ),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(Json(response).into_response())
    }
}
