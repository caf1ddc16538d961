//! v1 video endpoints.

use axum::{Router, extract::State, routing::get};
use serde::{Deserialize, Serialize};
use utopia_common::AppResult;
use utopia_core::{PageRequest, VideoFeedItem};
use utopia_db::entities::video;
use validator::Validate;

use crate::{
    extractors::{ApiQuery, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Category feed query.
#[derive(Debug, Deserialize, Validate)]
pub struct CategoryQuery {
    #[serde(default)]
    #[validate(range(min = 1))]
    pub category_id: i32,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

/// Video fields shared by every video listing.
#[derive(Serialize)]
pub struct VideoInfo {
    pub id: i32,
    pub author_id: i32,
    pub play_url: String,
    pub cover_url: String,
    pub describe: String,
    pub video_type: i32,
    /// Unix timestamp (seconds).
    pub created_at: i64,
}

impl From<video::Model> for VideoInfo {
    fn from(video: video::Model) -> Self {
        Self {
            id: video.id,
            author_id: video.author_id,
            play_url: video.play_url,
            cover_url: video.cover_url,
            describe: video.description,
            video_type: video.video_type,
            created_at: video.created_at.timestamp(),
        }
    }
}

/// A feed entry with the viewer's interaction flags.
#[derive(Serialize)]
pub struct VideoResponse {
    #[serde(flatten)]
    pub video: VideoInfo,
    pub like_count: u64,
    pub favorite_count: u64,
    pub is_like: bool,
    pub is_favorite: bool,
}

impl From<VideoFeedItem> for VideoResponse {
    fn from(item: VideoFeedItem) -> Self {
        Self {
            video: item.video.into(),
            like_count: item.like_count,
            favorite_count: item.favorite_count,
            is_like: item.is_like,
            is_favorite: item.is_favorite,
        }
    }
}

/// Feed response.
#[derive(Serialize)]
pub struct VideoFeed {
    pub videos: Vec<VideoResponse>,
}

/// Newest videos of a category.
async fn category(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CategoryQuery>,
) -> AppResult<ApiResponse<VideoFeed>> {
    query.validate()?;

    let items = state
        .video_service
        .category_feed(
            viewer,
            query.category_id,
            PageRequest::new(query.page, query.size),
        )
        .await?;

    Ok(ApiResponse::ok(VideoFeed {
        videos: items.into_iter().map(VideoResponse::from).collect(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/category", get(category))
}
