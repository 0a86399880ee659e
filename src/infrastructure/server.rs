// Server module - assembles the HTTP router and picks a listening port

use axum::http::HeaderValue;
use axum::Router;
use std::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api;
use crate::api_docs::ApiDoc;
use crate::infrastructure::AppState;

/// Build the full application router.
///
/// An empty `cors_allowed_origins` list allows any origin.
pub fn build_router(state: AppState, cors_allowed_origins: &[String]) -> Router {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    let cors = if cors_allowed_origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let mut origins = Vec::new();
        for origin in cors_allowed_origins {
            match origin.parse::<HeaderValue>() {
                Ok(v) => origins.push(v),
                Err(e) => tracing::error!("Failed to parse CORS origin '{}': {}", origin, e),
            }
        }
        cors.allow_origin(origins)
    };

    Router::new()
        .merge(SwaggerUi::new("/api/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api::api_router())
        .nest("/playground", api::playground::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Find an available port starting from the preferred port on a specific IP
pub fn find_available_port_on_ip(preferred_port: u16, ip: &str) -> Option<u16> {
    if TcpListener::bind((ip, preferred_port)).is_ok() {
        return Some(preferred_port);
    }

    // Scan next 100 ports, never wrapping past u16::MAX
    let first = preferred_port.checked_add(1)?;
    (first..=preferred_port.saturating_add(100))
        .find(|&port| TcpListener::bind((ip, port)).is_ok())
}

/// Find an available port starting from the preferred port (0.0.0.0)
pub fn find_available_port(preferred_port: u16) -> Option<u16> {
    find_available_port_on_ip(preferred_port, "0.0.0.0")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_scan_stops_at_the_top_of_the_range() {
        // Holding the last port leaves nothing above it to scan
        let _held = TcpListener::bind(("127.0.0.1", u16::MAX)).ok();
        assert_eq!(find_available_port_on_ip(u16::MAX, "127.0.0.1"), None);
    }

    #[test]
    fn port_scan_moves_past_a_busy_port() {
        let held = TcpListener::bind(("127.0.0.1", 0)).unwrap();
        let busy = held.local_addr().unwrap().port();

        let found = find_available_port_on_ip(busy, "127.0.0.1").unwrap();
        assert_ne!(found, busy);
        assert!(found > busy && found <= busy.saturating_add(100));
    }
}
