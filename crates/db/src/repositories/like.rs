//! Like repository.
//!
//! Likes are toggle records: a row is created on the first like and only its
//! `status` changes afterwards. Activation is a single upsert keyed on
//! `(user_id, video_id)` so concurrent likes of the same pair cannot create a
//! second row.

use std::sync::Arc;

use crate::entities::{Like, like};
use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect, Set,
    prelude::DateTimeWithTimeZone,
    sea_query::{Expr, OnConflict},
};
use utopia_common::{AppError, AppResult};

/// Like repository for database operations.
#[derive(Clone)]
pub struct LikeRepository {
    db: Arc<DatabaseConnection>,
}

impl LikeRepository {
    /// Create a new like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Like a video: insert the pair, or set `status = true` if it exists.
    pub async fn like(&self, user_id: i32, video_id: i32) -> AppResult<()> {
        let now: DateTimeWithTimeZone = Utc::now().into();
        let model = like::ActiveModel {
            user_id: Set(user_id),
            video_id: Set(video_id),
            status: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Like::insert(model)
            .on_conflict(
                OnConflict::columns([like::Column::UserId, like::Column::VideoId])
                    .update_columns([like::Column::Status, like::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Unlike a video. A pair that was never liked is left untouched.
    pub async fn unlike(&self, user_id: i32, video_id: i32) -> AppResult<()> {
        let now: DateTimeWithTimeZone = Utc::now().into();
        let result = Like::update_many()
            .col_expr(like::Column::Status, Expr::value(false))
            .col_expr(like::Column::UpdatedAt, Expr::value(now))
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::VideoId.eq(video_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::debug!(user_id, video_id, rows = result.rows_affected, "Cleared like");
        Ok(())
    }

    /// Find the like record of a pair.
    pub async fn find_by_pair(&self, user_id: i32, video_id: i32) -> AppResult<Option<like::Model>> {
        Like::find_by_id((user_id, video_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a user currently likes a video. Missing rows read as `false`.
    pub async fn is_liked(&self, user_id: i32, video_id: i32) -> AppResult<bool> {
        Ok(self
            .find_by_pair(user_id, video_id)
            .await?
            .is_some_and(|l| l.status))
    }

    /// IDs of users that currently like a video.
    pub async fn liked_user_ids(&self, video_id: i32) -> AppResult<Vec<i32>> {
        Like::find()
            .select_only()
            .column(like::Column::UserId)
            .filter(like::Column::VideoId.eq(video_id))
            .filter(like::Column::Status.eq(true))
            .into_tuple::<i32>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// IDs of videos a user currently likes.
    pub async fn liked_video_ids(&self, user_id: i32) -> AppResult<Vec<i32>> {
        Like::find()
            .select_only()
            .column(like::Column::VideoId)
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::Status.eq(true))
            .into_tuple::<i32>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count active likes of a video. Aggregated on every call.
    pub async fn count_likes(&self, video_id: i32) -> AppResult<u64> {
        Like::find()
            .filter(like::Column::VideoId.eq(video_id))
            .filter(like::Column::Status.eq(true))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_like(user_id: i32, video_id: i32, status: bool) -> like::Model {
        like::Model {
            user_id,
            video_id,
            status,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_like_is_a_single_upsert() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = LikeRepository::new(Arc::clone(&db));
        repo.like(1, 10).await.unwrap();
        drop(repo);

        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        assert_eq!(log.len(), 1);
        let sql = format!("{:?}", log[0]);
        assert!(sql.contains("INSERT INTO"));
        assert!(sql.contains("ON CONFLICT"));
        assert!(sql.contains("DO UPDATE SET"));
    }

    #[tokio::test]
    async fn test_unlike_without_row_is_ok() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = LikeRepository::new(Arc::clone(&db));
        assert!(repo.unlike(1, 10).await.is_ok());
        drop(repo);

        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        let sql = format!("{:?}", log[0]);
        assert!(sql.contains("UPDATE"));
        assert!(!sql.contains("INSERT"));
    }

    #[tokio::test]
    async fn test_is_liked_defaults_to_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<like::Model>::new()])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        assert!(!repo.is_liked(1, 10).await.unwrap());
    }

    #[tokio::test]
    async fn test_is_liked_reads_status() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_like(1, 10, true)]])
                .append_query_results([[create_test_like(1, 10, false)]])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        assert!(repo.is_liked(1, 10).await.unwrap());
        assert!(!repo.is_liked(1, 10).await.unwrap());
    }

    #[tokio::test]
    async fn test_liked_user_ids() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    maplit::btreemap! { "user_id" => sea_orm::Value::Int(Some(1)) },
                    maplit::btreemap! { "user_id" => sea_orm::Value::Int(Some(2)) },
                ]])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        let ids = repo.liked_user_ids(10).await.unwrap();

        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_count_likes() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(3))
                }]])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        assert_eq!(repo.count_likes(10).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_database_error_is_propagated() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_errors([sea_orm::DbErr::Custom("connection reset".to_string())])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        match repo.like(1, 10).await {
            Err(AppError::Database(msg)) => assert!(msg.contains("connection reset")),
            other => panic!("Expected Database error, got {other:?}"),
        }
    }
}
