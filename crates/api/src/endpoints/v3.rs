//! API v3 interaction endpoints.
//!
//! Follow lists are paginated and report their total.

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use serde::Deserialize;
use utopia_common::AppResult;
use utopia_core::{LikeState, Page, PageRequest, UserSummary};

use crate::{
    endpoints::interact::{
        FollowActionRequest, VideoActionRequest, favorite_action, follow_action, like_action,
    },
    extractors::{ApiJson, ApiQuery, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Paginated list query.
#[derive(Debug, Default, Deserialize)]
pub struct PagedListQuery {
    pub user_id: Option<i32>,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

impl PagedListQuery {
    fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.size)
    }
}

async fn like(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<VideoActionRequest>,
) -> AppResult<ApiResponse<LikeState>> {
    let video_id = req.video_id;
    like_action(&state, user_id, req).await?;
    Ok(ApiResponse::ok(
        state.like_service.state(user_id, video_id).await?,
    ))
}

async fn favorite(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<VideoActionRequest>,
) -> AppResult<ApiResponse<()>> {
    favorite_action(&state, user_id, req).await?;
    Ok(ApiResponse::success())
}

async fn follow(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<FollowActionRequest>,
) -> AppResult<ApiResponse<()>> {
    follow_action(&state, user_id, req).await?;
    Ok(ApiResponse::success())
}

/// Resolve a page of IDs into summaries, keeping the paging fields.
async fn with_summaries(state: &AppState, page: Page<i32>) -> AppResult<Page<UserSummary>> {
    let items = state.user_service.summaries(&page.items).await?;
    Ok(Page {
        items,
        total: page.total,
        page: page.page,
        size: page.size,
    })
}

async fn follower_list(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PagedListQuery>,
) -> AppResult<ApiResponse<Page<UserSummary>>> {
    let owner = query.user_id.unwrap_or(user_id);
    let page = state
        .follow_service
        .follower_page(owner, query.page_request())
        .await?;
    Ok(ApiResponse::ok(with_summaries(&state, page).await?))
}

async fn follow_list(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PagedListQuery>,
) -> AppResult<ApiResponse<Page<UserSummary>>> {
    let owner = query.user_id.unwrap_or(user_id);
    let page = state
        .follow_service
        .followee_page(owner, query.page_request())
        .await?;
    Ok(ApiResponse::ok(with_summaries(&state, page).await?))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/interact/like", post(like))
        .route("/interact/follow", post(follow))
        .route("/interact/favorite", post(favorite))
        .route("/interact/follower/list", get(follower_list))
        .route("/interact/follow/list", get(follow_list))
}
