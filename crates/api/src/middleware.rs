//! Shared application state.

#![allow(missing_docs)]

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use utopia_common::{Config, JwtKeys, StorageCredentials};
use utopia_core::{
    FavoriteService, FollowService, LikeService, UploadService, UserService, VideoService,
};
use utopia_db::repositories::{
    FavoriteRepository, FollowRepository, LikeRepository, UserRepository, VideoRepository,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub video_service: VideoService,
    pub like_service: LikeService,
    pub follow_service: FollowService,
    pub favorite_service: FavoriteService,
    pub upload_service: UploadService,
    pub jwt_keys: JwtKeys,
}

impl AppState {
    /// Wire repositories and services over one connection pool.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>, config: &Config) -> Self {
        let user_repo = UserRepository::new(Arc::clone(&db));
        let video_repo = VideoRepository::new(Arc::clone(&db));
        let like_repo = LikeRepository::new(Arc::clone(&db));
        let follow_repo = FollowRepository::new(Arc::clone(&db));
        let favorite_repo = FavoriteRepository::new(db);

        let jwt_keys = JwtKeys::from_config(&config.auth);
        let storage = StorageCredentials::from_config(&config.storage);

        Self {
            user_service: UserService::new(user_repo.clone(), jwt_keys.clone()),
            video_service: VideoService::new(
                video_repo.clone(),
                like_repo.clone(),
                favorite_repo.clone(),
            ),
            like_service: LikeService::new(like_repo, video_repo.clone()),
            follow_service: FollowService::new(follow_repo, user_repo.clone()),
            favorite_service: FavoriteService::new(favorite_repo, video_repo.clone()),
            upload_service: UploadService::new(storage, video_repo, user_repo),
            jwt_keys,
        }
    }
}
