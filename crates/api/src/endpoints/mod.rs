//! API endpoints.
//!
//! Three API versions share one router. v1 is the full surface; v2 and v3
//! only carry interaction routes.

mod interact;
mod v1;
mod v2;
mod v3;

use axum::{Json, Router, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", v1::router())
        .nest("/api/v2", v2::router())
        .nest("/api/v3", v3::router())
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
}

/// Unknown method or path.
async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "code": "404",
            "message": "route not found, check the request method and path",
        })),
    )
}
