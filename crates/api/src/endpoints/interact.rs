//! Request types and action dispatch shared by every API version.

use serde::Deserialize;
use utopia_common::AppResult;
use utopia_core::ActionType;
use validator::Validate;

use crate::middleware::AppState;

/// Like or favorite request. Missing fields read as 0 and fail validation.
#[derive(Debug, Deserialize, Validate)]
pub struct VideoActionRequest {
    #[serde(default)]
    #[validate(range(min = 1))]
    pub video_id: i32,

    #[serde(default)]
    #[validate(range(min = 1))]
    pub action_type: i32,
}

/// Follow request.
#[derive(Debug, Deserialize, Validate)]
pub struct FollowActionRequest {
    #[serde(default)]
    #[validate(range(min = 1))]
    pub to_user_id: i32,

    #[serde(default)]
    #[validate(range(min = 1))]
    pub action_type: i32,
}

/// Whose list to read. Defaults to the caller.
#[derive(Debug, Default, Deserialize)]
pub struct UserListQuery {
    pub user_id: Option<i32>,
}

impl UserListQuery {
    pub fn owner(&self, caller: i32) -> i32 {
        self.user_id.unwrap_or(caller)
    }
}

/// Like or unlike, depending on `action_type`.
pub async fn like_action(state: &AppState, user_id: i32, req: VideoActionRequest) -> AppResult<()> {
    req.validate()?;
    match ActionType::try_from(req.action_type)? {
        ActionType::Activate => state.like_service.like(user_id, req.video_id).await,
        ActionType::Deactivate => state.like_service.unlike(user_id, req.video_id).await,
    }
}

/// Follow or unfollow, depending on `action_type`.
pub async fn follow_action(
    state: &AppState,
    user_id: i32,
    req: FollowActionRequest,
) -> AppResult<()> {
    req.validate()?;
    match ActionType::try_from(req.action_type)? {
        ActionType::Activate => state.follow_service.follow(user_id, req.to_user_id).await,
        ActionType::Deactivate => state.follow_service.unfollow(user_id, req.to_user_id).await,
    }
}

/// Favorite or unfavorite, depending on `action_type`.
pub async fn favorite_action(
    state: &AppState,
    user_id: i32,
    req: VideoActionRequest,
) -> AppResult<()> {
    req.validate()?;
    match ActionType::try_from(req.action_type)? {
        ActionType::Activate => state.favorite_service.favorite(user_id, req.video_id).await,
        ActionType::Deactivate => state.favorite_service.unfavorite(user_id, req.video_id).await,
    }
}
