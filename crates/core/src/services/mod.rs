//! Business logic services.

#![allow(missing_docs)]

pub mod action;
pub mod favorite;
pub mod follow;
pub mod like;
pub mod upload;
pub mod user;
pub mod video;

pub use action::ActionType;
pub use favorite::FavoriteService;
pub use follow::FollowService;
pub use like::{LikeService, LikeState};
pub use upload::{UploadCallbackInput, UploadOutcome, UploadService};
pub use user::{
    AuthOutput, LoginInput, RegisterInput, UpdateNicknameInput, UserService, UserSummary,
};
pub use video::{VideoFeedItem, VideoService};
