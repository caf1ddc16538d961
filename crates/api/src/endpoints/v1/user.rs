//! v1 user endpoints.

use axum::{Router, extract::State, routing::post};
use utopia_common::AppResult;
use utopia_core::{AuthOutput, LoginInput, RegisterInput, UpdateNicknameInput};

use crate::{
    extractors::{ApiJson, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Create an account and return a token for it.
async fn register(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<RegisterInput>,
) -> AppResult<ApiResponse<AuthOutput>> {
    let output = state.user_service.register(input).await?;
    Ok(ApiResponse::ok(output))
}

/// Exchange credentials for a token.
async fn login(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<LoginInput>,
) -> AppResult<ApiResponse<AuthOutput>> {
    let output = state.user_service.login(input).await?;
    Ok(ApiResponse::ok(output))
}

/// Change the caller's nickname.
async fn nickname(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<UpdateNicknameInput>,
) -> AppResult<ApiResponse<()>> {
    state.user_service.update_nickname(user_id, input).await?;
    Ok(ApiResponse::success())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/nickname", post(nickname))
}
