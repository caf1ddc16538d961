//! Favorite repository.

use std::sync::Arc;

use crate::entities::{Favorite, favorite};
use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
    prelude::DateTimeWithTimeZone,
    sea_query::{Expr, OnConflict},
};
use utopia_common::{AppError, AppResult};

/// Favorite repository for database operations.
#[derive(Clone)]
pub struct FavoriteRepository {
    db: Arc<DatabaseConnection>,
}

impl FavoriteRepository {
    /// Create a new favorite repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Favorite a video: insert the pair, or reactivate it.
    pub async fn favorite(&self, user_id: i32, video_id: i32) -> AppResult<()> {
        let now: DateTimeWithTimeZone = Utc::now().into();
        let model = favorite::ActiveModel {
            user_id: Set(user_id),
            video_id: Set(video_id),
            status: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Favorite::insert(model)
            .on_conflict(
                OnConflict::columns([favorite::Column::UserId, favorite::Column::VideoId])
                    .update_columns([favorite::Column::Status, favorite::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Remove a favorite. Missing pairs are a no-op.
    pub async fn unfavorite(&self, user_id: i32, video_id: i32) -> AppResult<()> {
        let now: DateTimeWithTimeZone = Utc::now().into();
        Favorite::update_many()
            .col_expr(favorite::Column::Status, Expr::value(false))
            .col_expr(favorite::Column::UpdatedAt, Expr::value(now))
            .filter(favorite::Column::UserId.eq(user_id))
            .filter(favorite::Column::VideoId.eq(video_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Check if a user currently has a video in favorites.
    pub async fn is_favorited(&self, user_id: i32, video_id: i32) -> AppResult<bool> {
        let row = Favorite::find_by_id((user_id, video_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(row.is_some_and(|f| f.status))
    }

    /// IDs of a user's favorited videos, most recent first.
    pub async fn favorited_video_ids(&self, user_id: i32) -> AppResult<Vec<i32>> {
        Favorite::find()
            .select_only()
            .column(favorite::Column::VideoId)
            .filter(favorite::Column::UserId.eq(user_id))
            .filter(favorite::Column::Status.eq(true))
            .order_by_desc(favorite::Column::UpdatedAt)
            .into_tuple::<i32>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count active favorites of a video.
    pub async fn count_favorites(&self, video_id: i32) -> AppResult<u64> {
        Favorite::find()
            .filter(favorite::Column::VideoId.eq(video_id))
            .filter(favorite::Column::Status.eq(true))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
