//! API v2 interaction endpoints.
//!
//! Same actions as v1, but every reply uses the envelope and lists carry
//! user summaries instead of bare IDs.

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use serde::Serialize;
use utopia_common::AppResult;
use utopia_core::{LikeState, UserSummary};

use crate::{
    endpoints::interact::{
        FollowActionRequest, UserListQuery, VideoActionRequest, favorite_action, follow_action,
        like_action,
    },
    extractors::{ApiJson, ApiQuery, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// A list of user summaries.
#[derive(Serialize)]
pub struct UserList {
    pub users: Vec<UserSummary>,
}

/// Like or unlike, then report the video's like state.
async fn like(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<VideoActionRequest>,
) -> AppResult<ApiResponse<LikeState>> {
    let video_id = req.video_id;
    like_action(&state, user_id, req).await?;

    let like_state = state.like_service.state(user_id, video_id).await?;
    Ok(ApiResponse::ok(like_state))
}

async fn follow(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<FollowActionRequest>,
) -> AppResult<ApiResponse<()>> {
    follow_action(&state, user_id, req).await?;
    Ok(ApiResponse::success())
}

async fn favorite(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<VideoActionRequest>,
) -> AppResult<ApiResponse<()>> {
    favorite_action(&state, user_id, req).await?;
    Ok(ApiResponse::success())
}

async fn follower_list(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UserListQuery>,
) -> AppResult<ApiResponse<UserList>> {
    let ids = state.follow_service.follower_ids(query.owner(user_id)).await?;
    let users = state.user_service.summaries(&ids).await?;
    Ok(ApiResponse::ok(UserList { users }))
}

async fn follow_list(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UserListQuery>,
) -> AppResult<ApiResponse<UserList>> {
    let ids = state.follow_service.followee_ids(query.owner(user_id)).await?;
    let users = state.user_service.summaries(&ids).await?;
    Ok(ApiResponse::ok(UserList { users }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/interact/like", post(like))
        .route("/interact/follow", post(follow))
        .route("/interact/favorite", post(favorite))
        .route("/interact/follower/list", get(follower_list))
        .route("/interact/follow/list", get(follow_list))
}
