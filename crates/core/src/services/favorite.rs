//! Favorite service.

use utopia_common::AppResult;
use utopia_db::{
    entities::video,
    repositories::{FavoriteRepository, VideoRepository},
};

/// Favorite service for business logic.
#[derive(Clone)]
pub struct FavoriteService {
    favorite_repo: FavoriteRepository,
    video_repo: VideoRepository,
}

impl FavoriteService {
    /// Create a new favorite service.
    #[must_use]
    pub const fn new(favorite_repo: FavoriteRepository, video_repo: VideoRepository) -> Self {
        Self {
            favorite_repo,
            video_repo,
        }
    }

    /// Add a video to a user's favorites.
    pub async fn favorite(&self, user_id: i32, video_id: i32) -> AppResult<()> {
        self.video_repo.ensure_exists(video_id).await?;
        self.favorite_repo.favorite(user_id, video_id).await?;

        tracing::debug!(user_id, video_id, "Favorited video");
        Ok(())
    }

    /// Remove a video from a user's favorites.
    pub async fn unfavorite(&self, user_id: i32, video_id: i32) -> AppResult<()> {
        self.video_repo.ensure_exists(video_id).await?;
        self.favorite_repo.unfavorite(user_id, video_id).await?;

        tracing::debug!(user_id, video_id, "Unfavorited video");
        Ok(())
    }

    /// A user's favorited videos, most recently favorited first.
    pub async fn list(&self, user_id: i32) -> AppResult<Vec<video::Model>> {
        let ids = self.favorite_repo.favorited_video_ids(user_id).await?;
        let mut videos = self.video_repo.find_by_ids(&ids).await?;
        videos.sort_by_key(|v| ids.iter().position(|id| *id == v.id));
        Ok(videos)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;
    use utopia_common::AppError;

    fn create_test_video(id: i32) -> video::Model {
        video::Model {
            id,
            author_id: 1,
            play_url: format!("https://cdn.example.com/{id}.mp4"),
            cover_url: format!("https://cdn.example.com/{id}.jpg"),
            description: String::new(),
            video_type: 1,
            created_at: Utc::now().into(),
        }
    }

    fn create_test_service(favorite_db: MockDatabase, video_db: MockDatabase) -> FavoriteService {
        FavoriteService::new(
            FavoriteRepository::new(Arc::new(favorite_db.into_connection())),
            VideoRepository::new(Arc::new(video_db.into_connection())),
        )
    }

    #[tokio::test]
    async fn test_favorite_missing_video() {
        let service = create_test_service(
            MockDatabase::new(DatabaseBackend::Postgres),
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<video::Model>::new()]),
        );

        assert!(matches!(
            service.favorite(1, 5).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_favorite_existing_video() {
        let service = create_test_service(
            MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }]),
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_video(5)]]),
        );

        assert!(service.favorite(1, 5).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_follows_favorite_order() {
        let service = create_test_service(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[
                maplit::btreemap! { "video_id" => sea_orm::Value::Int(Some(2)) },
                maplit::btreemap! { "video_id" => sea_orm::Value::Int(Some(7)) },
            ]]),
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_video(7), create_test_video(2)]]),
        );

        let ids: Vec<i32> = service.list(1).await.unwrap().iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![2, 7]);
    }
}
