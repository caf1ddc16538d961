//! Follow repository.

use std::sync::Arc;

use crate::entities::{Follow, follow};
use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
    prelude::DateTimeWithTimeZone,
    sea_query::{Expr, OnConflict},
};
use utopia_common::{AppError, AppResult};

/// Follow repository for database operations.
#[derive(Clone)]
pub struct FollowRepository {
    db: Arc<DatabaseConnection>,
}

impl FollowRepository {
    /// Create a new follow repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Start following: insert the pair, or reactivate it.
    pub async fn follow(&self, follower_id: i32, followee_id: i32) -> AppResult<()> {
        let now: DateTimeWithTimeZone = Utc::now().into();
        let model = follow::ActiveModel {
            follower_id: Set(follower_id),
            followee_id: Set(followee_id),
            status: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Follow::insert(model)
            .on_conflict(
                OnConflict::columns([follow::Column::FollowerId, follow::Column::FolloweeId])
                    .update_columns([follow::Column::Status, follow::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Stop following. Missing pairs are a no-op.
    pub async fn unfollow(&self, follower_id: i32, followee_id: i32) -> AppResult<()> {
        let now: DateTimeWithTimeZone = Utc::now().into();
        let result = Follow::update_many()
            .col_expr(follow::Column::Status, Expr::value(false))
            .col_expr(follow::Column::UpdatedAt, Expr::value(now))
            .filter(follow::Column::FollowerId.eq(follower_id))
            .filter(follow::Column::FolloweeId.eq(followee_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::debug!(
            follower_id,
            followee_id,
            rows = result.rows_affected,
            "Cleared follow"
        );
        Ok(())
    }

    /// Check if `follower_id` currently follows `followee_id`.
    pub async fn is_following(&self, follower_id: i32, followee_id: i32) -> AppResult<bool> {
        let row = Follow::find_by_id((follower_id, followee_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(row.is_some_and(|f| f.status))
    }

    /// IDs of the users following `user_id`.
    pub async fn follower_ids(&self, user_id: i32) -> AppResult<Vec<i32>> {
        Follow::find()
            .select_only()
            .column(follow::Column::FollowerId)
            .filter(follow::Column::FolloweeId.eq(user_id))
            .filter(follow::Column::Status.eq(true))
            .order_by_desc(follow::Column::UpdatedAt)
            .into_tuple::<i32>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// IDs of the users `user_id` follows.
    pub async fn followee_ids(&self, user_id: i32) -> AppResult<Vec<i32>> {
        Follow::find()
            .select_only()
            .column(follow::Column::FolloweeId)
            .filter(follow::Column::FollowerId.eq(user_id))
            .filter(follow::Column::Status.eq(true))
            .order_by_desc(follow::Column::UpdatedAt)
            .into_tuple::<i32>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// One page of follower IDs, most recent first.
    pub async fn follower_ids_paged(
        &self,
        user_id: i32,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<i32>> {
        Follow::find()
            .select_only()
            .column(follow::Column::FollowerId)
            .filter(follow::Column::FolloweeId.eq(user_id))
            .filter(follow::Column::Status.eq(true))
            .order_by_desc(follow::Column::UpdatedAt)
            .order_by_asc(follow::Column::FollowerId)
            .limit(limit)
            .offset(offset)
            .into_tuple::<i32>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// One page of followee IDs, most recent first.
    pub async fn followee_ids_paged(
        &self,
        user_id: i32,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<i32>> {
        Follow::find()
            .select_only()
            .column(follow::Column::FolloweeId)
            .filter(follow::Column::FollowerId.eq(user_id))
            .filter(follow::Column::Status.eq(true))
            .order_by_desc(follow::Column::UpdatedAt)
            .order_by_asc(follow::Column::FolloweeId)
            .limit(limit)
            .offset(offset)
            .into_tuple::<i32>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count active followers of a user.
    pub async fn count_followers(&self, user_id: i32) -> AppResult<u64> {
        Follow::find()
            .filter(follow::Column::FolloweeId.eq(user_id))
            .filter(follow::Column::Status.eq(true))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count users a user actively follows.
    pub async fn count_followees(&self, user_id: i32) -> AppResult<u64> {
        Follow::find()
            .filter(follow::Column::FollowerId.eq(user_id))
            .filter(follow::Column::Status.eq(true))
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

    fn create_test_follow(follower_id: i32, followee_id: i32, status: bool) -> follow::Model {
        follow::Model {
            follower_id,
            followee_id,
            status,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_follow_upserts() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = FollowRepository::new(Arc::clone(&db));
        repo.follow(1, 2).await.unwrap();
        drop(repo);

        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        let sql = format!("{:?}", log[0]);
        assert!(sql.contains("ON CONFLICT"));
    }

    #[tokio::test]
    async fn test_is_following() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_follow(1, 2, true)]])
                .append_query_results([[create_test_follow(1, 3, false)]])
                .append_query_results([Vec::<follow::Model>::new()])
                .into_connection(),
        );

        let repo = FollowRepository::new(db);
        assert!(repo.is_following(1, 2).await.unwrap());
        assert!(!repo.is_following(1, 3).await.unwrap());
        assert!(!repo.is_following(1, 4).await.unwrap());
    }

    #[tokio::test]
    async fn test_follower_ids_paged() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    maplit::btreemap! { "follower_id" => sea_orm::Value::Int(Some(5)) },
                ]])
                .into_connection(),
        );

        let repo = FollowRepository::new(Arc::clone(&db));
        let ids = repo.follower_ids_paged(2, 1, 3).await.unwrap();
        drop(repo);

        assert_eq!(ids, vec![5]);
        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        let sql = format!("{:?}", log[0]);
        assert!(sql.contains("LIMIT"));
        assert!(sql.contains("OFFSET"));
    }

    #[tokio::test]
    async fn test_count_followers_and_followees() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(4))
                }]])
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(0))
                }]])
                .into_connection(),
        );

        let repo = FollowRepository::new(db);
        assert_eq!(repo.count_followers(2).await.unwrap(), 4);
        assert_eq!(repo.count_followees(2).await.unwrap(), 0);
    }
}
