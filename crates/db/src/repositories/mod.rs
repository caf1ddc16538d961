//! Database repositories.

mod favorite;
mod follow;
mod like;
mod user;
mod video;

pub use favorite::FavoriteRepository;
pub use follow::FollowRepository;
pub use like::LikeRepository;
pub use user::UserRepository;
pub use video::VideoRepository;
