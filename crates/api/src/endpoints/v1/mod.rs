//! API v1: the full surface.

mod interact;
mod upload;
mod user;
mod video;

use axum::Router;

use crate::middleware::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/user", user::router())
        .nest("/interact", interact::router())
        .nest("/upload", upload::router())
        .nest("/video", video::router())
}
