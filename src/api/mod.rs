pub mod error;
pub mod health;
pub mod playground;

use axum::{routing::get, Router};

use crate::infrastructure::AppState;

/// JSON API, mounted under `/api`
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
}
