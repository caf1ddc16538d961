//! Database entities.

#![allow(missing_docs)]

pub mod favorite;
pub mod follow;
pub mod like;
pub mod user;
pub mod video;

pub use favorite::Entity as Favorite;
pub use follow::Entity as Follow;
pub use like::Entity as Like;
pub use user::Entity as User;
pub use video::Entity as Video;
