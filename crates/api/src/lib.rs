//! HTTP API layer for utopia.
//!
//! - **Endpoints**: versioned routes under `/api/v1`, `/api/v2` and `/api/v3`
//! - **Extractors**: bearer authentication, JSON bodies, query strings
//! - **Rate limiting**: one window shared by the whole process
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod rate_limit;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
pub use rate_limit::{ApiRateLimiter, RateLimitConfig, rate_limit_middleware};
