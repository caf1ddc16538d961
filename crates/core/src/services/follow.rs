//! Follow service.

use utopia_common::{AppError, AppResult};
use utopia_db::repositories::{FollowRepository, UserRepository};

use crate::pagination::{Page, PageRequest};

/// Follow service for business logic.
#[derive(Clone)]
pub struct FollowService {
    follow_repo: FollowRepository,
    user_repo: UserRepository,
}

impl FollowService {
    /// Create a new follow service.
    #[must_use]
    pub const fn new(follow_repo: FollowRepository, user_repo: UserRepository) -> Self {
        Self {
            follow_repo,
            user_repo,
        }
    }

    /// Follow another user.
    pub async fn follow(&self, follower_id: i32, followee_id: i32) -> AppResult<()> {
        if follower_id == followee_id {
            return Err(AppError::Validation("cannot follow yourself".to_string()));
        }
        self.user_repo.get_by_id(followee_id).await?;

        self.follow_repo.follow(follower_id, followee_id).await?;
        tracing::debug!(follower_id, followee_id, "Followed user");
        Ok(())
    }

    /// Unfollow a user. Unfollowing someone not followed is not an error.
    pub async fn unfollow(&self, follower_id: i32, followee_id: i32) -> AppResult<()> {
        if follower_id == followee_id {
            return Err(AppError::Validation("cannot follow yourself".to_string()));
        }
        self.user_repo.get_by_id(followee_id).await?;

        self.follow_repo.unfollow(follower_id, followee_id).await?;
        tracing::debug!(follower_id, followee_id, "Unfollowed user");
        Ok(())
    }

    /// Everyone following `user_id`.
    pub async fn follower_ids(&self, user_id: i32) -> AppResult<Vec<i32>> {
        self.follow_repo.follower_ids(user_id).await
    }

    /// Everyone `user_id` follows.
    pub async fn followee_ids(&self, user_id: i32) -> AppResult<Vec<i32>> {
        self.follow_repo.followee_ids(user_id).await
    }

    /// One page of followers with the total count.
    pub async fn follower_page(&self, user_id: i32, request: PageRequest) -> AppResult<Page<i32>> {
        let total = self.follow_repo.count_followers(user_id).await?;
        let ids = self
            .follow_repo
            .follower_ids_paged(user_id, request.limit(), request.offset())
            .await?;
        Ok(Page::new(ids, total, request))
    }

    /// One page of followees with the total count.
    pub async fn followee_page(&self, user_id: i32, request: PageRequest) -> AppResult<Page<i32>> {
        let total = self.follow_repo.count_followees(user_id).await?;
        let ids = self
            .follow_repo
            .followee_ids_paged(user_id, request.limit(), request.offset())
            .await?;
        Ok(Page::new(ids, total, request))
    }
}
