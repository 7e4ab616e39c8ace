use axum::{
    Json,
    extract::{Query, State},
};
use cirrus_model::{ResourcesQuery, ResourcesResponse, allowed_by_any};
use tracing::{debug, info};

use crate::infra::{app_state::AppState, errors::AppResult};

/// `GET /api/resources[?tag=]`
///
/// Lists the library for the requested tag, or the configured library tag
/// when the query names none. Resources whose URL falls outside the remote
/// image patterns are left out.
pub async fn list_resources(
    State(state): State<AppState>,
    Query(query): Query<ResourcesQuery>,
) -> AppResult<Json<ResourcesResponse>> {
    let tag = query
        .tag
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .or_else(|| state.config().cloudinary.library_tag.clone());

    let listed = state.provider().list_resources(tag.as_deref()).await?;
    let total = listed.len();

    let patterns = &state.config().remote_patterns;
    let data: Vec<_> = listed
        .into_iter()
        .filter(|resource| allowed_by_any(patterns, &resource.secure_url))
        .collect();

    if data.len() != total {
        debug!(
            rejected = total - data.len(),
            "dropped resources outside remote image patterns"
        );
    }
    info!(tag = ?tag, count = data.len(), "listed resources");

    Ok(Json(ResourcesResponse { data }))
}
