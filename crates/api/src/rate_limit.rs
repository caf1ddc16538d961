//! API rate limiting middleware.
//!
//! One fixed window shared by every request the process serves. Over-limit
//! requests get the usual HTTP 200 error envelope plus `Retry-After`.

#![allow(missing_docs)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::RwLock;
use utopia_common::{AppError, config::RateLimitSettings};

/// Rate limit configuration.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Maximum requests per window.
    pub max_requests: u32,
    /// Time window duration in seconds.
    pub window_secs: u64,
}

impl RateLimitConfig {
    /// Create a new rate limit config.
    #[must_use]
    pub const fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
        }
    }
}

impl From<&RateLimitSettings> for RateLimitConfig {
    fn from(settings: &RateLimitSettings) -> Self {
        Self::new(settings.max_requests, settings.window_secs)
    }
}

/// Counter for the current window.
#[derive(Debug)]
struct WindowState {
    count: u32,
    window_start: Instant,
}

/// Process-wide fixed-window rate limiter.
#[derive(Clone)]
pub struct ApiRateLimiter {
    config: RateLimitConfig,
    state: Arc<RwLock<WindowState>>,
}

impl ApiRateLimiter {
    /// Create a new rate limiter.
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            state: Arc::new(RwLock::new(WindowState {
                count: 0,
                window_start: Instant::now(),
            })),
        }
    }

    /// Check if a request is allowed and record it.
    pub async fn check(&self) -> RateLimitResult {
        let mut state = self.state.write().await;
        let now = Instant::now();
        let window = Duration::from_secs(self.config.window_secs);

        if now.duration_since(state.window_start) >= window {
            state.count = 0;
            state.window_start = now;
        }

        let reset = window.saturating_sub(now.duration_since(state.window_start));

        if state.count >= self.config.max_requests {
            return RateLimitResult::Limited {
                // Never tell the client to retry immediately.
                retry_after: reset.as_secs().max(1),
            };
        }

        state.count += 1;
        RateLimitResult::Allowed {
            remaining: self.config.max_requests.saturating_sub(state.count),
        }
    }
}

/// Rate limit check result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Request is allowed.
    Allowed {
        /// Remaining requests in window.
        remaining: u32,
    },
    /// Request is rate limited.
    Limited {
        /// Seconds until the window resets.
        retry_after: u64,
    },
}

/// Rate limit error response.
#[derive(Debug)]
pub struct RateLimitError {
    pub retry_after: u64,
}

impl IntoResponse for RateLimitError {
    fn into_response(self) -> Response {
        let mut response = AppError::RateLimited.into_response();
        response
            .headers_mut()
            .insert(header::RETRY_AFTER, HeaderValue::from(self.retry_after));
        response
    }
}

/// Rate limiting middleware.
pub async fn rate_limit_middleware(
    State(limiter): State<ApiRateLimiter>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, RateLimitError> {
    match limiter.check().await {
        RateLimitResult::Allowed { .. } => Ok(next.run(req).await),
        RateLimitResult::Limited { retry_after } => {
            tracing::warn!(retry_after, path = %req.uri().path(), "Rate limit exceeded");
            Err(RateLimitError { retry_after })
        }
    }
}
