//! # Cirrus Server
//!
//! HTTP backend for the Cirrus gallery. It lists the hosted media library
//! and signs direct browser uploads so the API secret never leaves the
//! server.
//!
//! Routes:
//! - `GET /api/resources[?tag=]`: current library listing
//! - `POST /api/sign-cloudinary-params`: upload signature
//! - `GET /ping`, `GET /health`

pub mod handlers;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
    routing::get,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use handlers::system::{health_handler, ping_handler};

pub fn create_app(state: AppState) -> Router {
    let cors_layer = build_cors_layer(&state);

    Router::new()
        .route("/ping", get(ping_handler))
        .route("/health", get(health_handler))
        .merge(routes::create_api_router())
        // Outer to inner: CORS, then tracing
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

// Permissive in dev, allow-list otherwise.
fn build_cors_layer(state: &AppState) -> CorsLayer {
    let config = state.config();
    if config.dev_mode {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .filter(|origin| origin.trim() != "*")
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-requested-with"),
        ])
}
