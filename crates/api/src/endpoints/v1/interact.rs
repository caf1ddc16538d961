//! v1 interaction endpoints.
//!
//! Toggle endpoints keep the legacy reply shape. Lists use the envelope.

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use serde::Serialize;
use utopia_common::{AppError, AppResult};

use super::video::VideoInfo;
use crate::{
    endpoints::interact::{
        FollowActionRequest, UserListQuery, VideoActionRequest, favorite_action, follow_action,
        like_action,
    },
    extractors::{ApiJson, ApiQuery, AuthUser},
    middleware::AppState,
    response::{ApiResponse, LegacyOk, LegacyResult},
};

/// A list of user IDs.
#[derive(Serialize)]
pub struct UserIdList {
    pub user_ids: Vec<i32>,
}

/// A list of videos.
#[derive(Serialize)]
pub struct VideoList {
    pub videos: Vec<VideoInfo>,
}

/// Like or unlike a video.
async fn like(
    auth: Result<AuthUser, AppError>,
    State(state): State<AppState>,
    body: Result<ApiJson<VideoActionRequest>, AppError>,
) -> LegacyResult {
    let AuthUser(user_id) = auth?;
    let ApiJson(req) = body?;
    like_action(&state, user_id, req).await?;
    Ok(LegacyOk)
}

/// Follow or unfollow a user.
async fn follow(
    auth: Result<AuthUser, AppError>,
    State(state): State<AppState>,
    body: Result<ApiJson<FollowActionRequest>, AppError>,
) -> LegacyResult {
    let AuthUser(user_id) = auth?;
    let ApiJson(req) = body?;
    follow_action(&state, user_id, req).await?;
    Ok(LegacyOk)
}

/// Favorite or unfavorite a video.
async fn favorite(
    auth: Result<AuthUser, AppError>,
    State(state): State<AppState>,
    body: Result<ApiJson<VideoActionRequest>, AppError>,
) -> LegacyResult {
    let AuthUser(user_id) = auth?;
    let ApiJson(req) = body?;
    favorite_action(&state, user_id, req).await?;
    Ok(LegacyOk)
}

/// Users following someone.
async fn follower_list(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UserListQuery>,
) -> AppResult<ApiResponse<UserIdList>> {
    let user_ids = state.follow_service.follower_ids(query.owner(user_id)).await?;
    Ok(ApiResponse::ok(UserIdList { user_ids }))
}

/// Users someone follows.
async fn follow_list(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UserListQuery>,
) -> AppResult<ApiResponse<UserIdList>> {
    let user_ids = state.follow_service.followee_ids(query.owner(user_id)).await?;
    Ok(ApiResponse::ok(UserIdList { user_ids }))
}

/// Someone's favorited videos.
async fn favorite_list(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UserListQuery>,
) -> AppResult<ApiResponse<VideoList>> {
    let videos = state.favorite_service.list(query.owner(user_id)).await?;
    Ok(ApiResponse::ok(VideoList {
        videos: videos.into_iter().map(VideoInfo::from).collect(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/like", post(like))
        .route("/follow", post(follow))
        .route("/favorite", post(favorite))
        .route("/follower/list", get(follower_list))
        .route("/follow/list", get(follow_list))
        .route("/favorite/list", get(favorite_list))
}
