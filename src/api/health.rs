use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::infrastructure::AppState;

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service and database are healthy"),
        (status = 503, description = "Database unreachable")
    )
)]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let (status, database) = match state.db().ping().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            tracing::error!("Health check: database ping failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    (
        status,
        Json(json!({
            "status": if status == StatusCode::OK { "ok" } else { "degraded" },
            "service": "storefront",
            "version": env!("CARGO_PKG_VERSION"),
            "database": database
        })),
    )
}
