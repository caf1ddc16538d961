//! Like service.

use serde::Serialize;
use utopia_common::AppResult;
use utopia_db::repositories::{LikeRepository, VideoRepository};

/// Like service for business logic.
#[derive(Clone)]
pub struct LikeService {
    like_repo: LikeRepository,
    video_repo: VideoRepository,
}

/// Like state of one video as seen by one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeState {
    pub is_like: bool,
    pub like_count: u64,
}

impl LikeService {
    /// Create a new like service.
    #[must_use]
    pub const fn new(like_repo: LikeRepository, video_repo: VideoRepository) -> Self {
        Self {
            like_repo,
            video_repo,
        }
    }

    /// Like a video. Liking twice is not an error.
    pub async fn like(&self, user_id: i32, video_id: i32) -> AppResult<()> {
        self.video_repo.ensure_exists(video_id).await?;
        self.like_repo.like(user_id, video_id).await?;

        tracing::debug!(user_id, video_id, "Liked video");
        Ok(())
    }

    /// Unlike a video. Unliking something never liked is not an error.
    pub async fn unlike(&self, user_id: i32, video_id: i32) -> AppResult<()> {
        self.video_repo.ensure_exists(video_id).await?;
        self.like_repo.unlike(user_id, video_id).await?;

        tracing::debug!(user_id, video_id, "Unliked video");
        Ok(())
    }

    /// Check if a user likes a video.
    pub async fn is_liked(&self, user_id: i32, video_id: i32) -> AppResult<bool> {
        self.like_repo.is_liked(user_id, video_id).await
    }

    /// Count active likes of a video.
    pub async fn count(&self, video_id: i32) -> AppResult<u64> {
        self.like_repo.count_likes(video_id).await
    }

    /// Users that currently like a video.
    pub async fn liked_user_ids(&self, video_id: i32) -> AppResult<Vec<i32>> {
        self.like_repo.liked_user_ids(video_id).await
    }

    /// Whether `user_id` likes the video, plus its like count.
    pub async fn state(&self, user_id: i32, video_id: i32) -> AppResult<LikeState> {
        Ok(LikeState {
            is_like: self.is_liked(user_id, video_id).await?,
            like_count: self.count(video_id).await?,
        })
    }
}
