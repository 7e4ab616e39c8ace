use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cirrus_core::sign_params;
use cirrus_model::{MISSING_PARAMS_MESSAGE, SignParamsRequest, SignatureResponse};
use serde_json::Value;
use tracing::{debug, warn};

use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

/// `POST /api/sign-cloudinary-params`
///
/// The body is parsed by hand so a missing `paramsToSign` can be told apart
/// from malformed JSON, and so clients need not send a JSON content type.
pub async fn sign_cloudinary_params(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Response> {
    let request: SignParamsRequest = serde_json::from_slice(&body)
        .map_err(|err| {
            warn!(error = %err, "rejected unparseable signing request");
            AppError::bad_request(format!("Invalid JSON body: {err}"))
        })?;

    let params = match request.params_to_sign {
        Some(Value::Object(params)) => params,
        Some(value) if !is_blank(&value) => {
            return Err(AppError::bad_request("paramsToSign must be an object"));
        }
        _ => {
            return Ok(
                (StatusCode::BAD_REQUEST, MISSING_PARAMS_MESSAGE).into_response()
            );
        }
    };

    let cloudinary = &state.config().cloudinary;
    let signature = sign_params(
        &params,
        cloudinary.api_secret(),
        cloudinary.signature_algorithm,
    )?;

    debug!(
        params = params.len(),
        algorithm = %cloudinary.signature_algorithm,
        "signed upload parameters"
    );

    Ok(Json(SignatureResponse { signature }).into_response())
}

// Null, `false`, `""` and zero count as no parameters at all.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::String(text) => text.is_empty(),
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::Array(_) | Value::Object(_) => false,
    }
}
