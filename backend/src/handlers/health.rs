//! Liveness and storage reachability

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// "ok" when the store answers, "degraded" otherwise
    pub status: &'static str,
    pub version: &'static str,
    pub store: StoreHealth,
}

#[derive(Serialize)]
pub struct StoreHealth {
    pub reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Always answers 200; a dead store only degrades the status
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store = match state.store.ping().await {
        Ok(()) => StoreHealth {
            reachable: true,
            error: None,
        },
        Err(err) => {
            tracing::warn!(error = %err, "health check could not reach the store");
            StoreHealth {
                reachable: false,
                error: Some(err.to_string()),
            }
        }
    };

    Json(HealthResponse {
        status: if store.reachable { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        store,
    })
}
