use axum::{Json, extract::State};
use serde_json::{Value, json};
use tracing::debug;

use crate::infra::app_state::AppState;

pub async fn ping_handler() -> Json<Value> {
    debug!("ping");
    Json(json!({
        "status": "ok",
        "message": "Cirrus gallery server is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Reports whether listing and signing can work with the loaded
/// configuration. No request is made to the provider.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let provider = state.provider();
    let cloudinary = &state.config().cloudinary;

    let provider_ready = provider.is_configured();
    let signing_ready = cloudinary.has_api_secret();
    let overall = if provider_ready && signing_ready {
        "healthy"
    } else {
        "degraded"
    };

    Json(json!({
        "status": overall,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "checks": {
            "provider": {
                "name": provider.name(),
                "status": check_status(provider_ready),
                "library_tag": cloudinary.library_tag,
            },
            "signing": {
                "status": check_status(signing_ready),
                "algorithm": cloudinary.signature_algorithm.as_str(),
            },
            "remote_patterns": state.config().remote_patterns.len(),
        }
    }))
}

fn check_status(ready: bool) -> &'static str {
    if ready { "configured" } else { "not_configured" }
}
