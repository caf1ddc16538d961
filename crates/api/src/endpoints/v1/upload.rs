//! v1 upload endpoints.

use axum::{
    Router,
    body::Bytes,
    extract::{OriginalUri, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use utopia_common::{AppError, AppResult};
use utopia_core::{UploadCallbackInput, UploadOutcome};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Upload token response.
#[derive(Serialize)]
pub struct UploadTokenData {
    pub token: String,
}

/// Image callback response.
#[derive(Serialize)]
pub struct ImageData {
    pub image_url: String,
}

/// Hand out an upload token.
async fn token(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<UploadTokenData>> {
    let token = state.upload_service.upload_token(user_id)?;
    Ok(ApiResponse::ok(UploadTokenData { token }))
}

/// Storage provider callback after an upload completes.
async fn callback(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Response> {
    let path_and_query = uri
        .path_and_query()
        .map_or_else(|| uri.path(), |pq| pq.as_str());
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    state
        .upload_service
        .verify_callback(authorization, path_and_query, content_type, &body)?;

    let input: UploadCallbackInput =
        serde_json::from_slice(&body).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let response = match state.upload_service.handle_callback(input).await? {
        UploadOutcome::Image { image_url } => {
            ApiResponse::ok(ImageData { image_url }).into_response()
        }
        UploadOutcome::Video(_) => ApiResponse::success().into_response(),
    };
    Ok(response)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/token", get(token))
        .route("/callback", post(callback))
}
