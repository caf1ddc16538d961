//! Video service.

use std::collections::HashSet;

use utopia_common::AppResult;
use utopia_db::{
    entities::video,
    repositories::{FavoriteRepository, LikeRepository, VideoRepository},
};

use crate::pagination::PageRequest;

/// A video as shown in a feed, with the viewer's interaction flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFeedItem {
    pub video: video::Model,
    pub like_count: u64,
    pub favorite_count: u64,
    pub is_like: bool,
    pub is_favorite: bool,
}

/// Video service for business logic.
#[derive(Clone)]
pub struct VideoService {
    video_repo: VideoRepository,
    like_repo: LikeRepository,
    favorite_repo: FavoriteRepository,
}

impl VideoService {
    /// Create a new video service.
    #[must_use]
    pub const fn new(
        video_repo: VideoRepository,
        like_repo: LikeRepository,
        favorite_repo: FavoriteRepository,
    ) -> Self {
        Self {
            video_repo,
            like_repo,
            favorite_repo,
        }
    }

    /// Newest videos of a category. Anonymous viewers get every flag `false`.
    pub async fn category_feed(
        &self,
        viewer: Option<i32>,
        video_type: i32,
        request: PageRequest,
    ) -> AppResult<Vec<VideoFeedItem>> {
        let videos = self
            .video_repo
            .find_by_category(video_type, request.limit(), request.offset())
            .await?;

        let (liked, favorited) = match viewer {
            Some(user_id) if !videos.is_empty() => (
                self.like_repo
                    .liked_video_ids(user_id)
                    .await?
                    .into_iter()
                    .collect::<HashSet<_>>(),
                self.favorite_repo
                    .favorited_video_ids(user_id)
                    .await?
                    .into_iter()
                    .collect::<HashSet<_>>(),
            ),
            _ => (HashSet::new(), HashSet::new()),
        };

        let mut items = Vec::with_capacity(videos.len());
        for video in videos {
            let like_count = self.like_repo.count_likes(video.id).await?;
            let favorite_count = self.favorite_repo.count_favorites(video.id).await?;
            items.push(VideoFeedItem {
                is_like: liked.contains(&video.id),
                is_favorite: favorited.contains(&video.id),
                like_count,
                favorite_count,
                video,
            });
        }
        Ok(items)
    }
}
