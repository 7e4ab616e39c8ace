use axum::{
    Router,
    routing::{get, post},
};

use crate::{
    handlers::{resources::list_resources, sign::sign_cloudinary_params},
    infra::app_state::AppState,
};

pub const RESOURCES: &str = "/api/resources";
pub const SIGN_CLOUDINARY_PARAMS: &str = "/api/sign-cloudinary-params";

pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route(RESOURCES, get(list_resources))
        .route(SIGN_CLOUDINARY_PARAMS, post(sign_cloudinary_params))
}
