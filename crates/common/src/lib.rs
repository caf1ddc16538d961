//! Common utilities and shared types for utopia.
//!
//! This crate provides foundational components used across all utopia crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Authentication**: Bearer token issuing and verification via [`JwtKeys`]
//! - **Storage**: Upload tokens and callback signatures via [`StorageCredentials`]
//!
//! # Example
//!
//! ```no_run
//! use utopia_common::{AppResult, Config, JwtKeys};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let keys = JwtKeys::from_config(&config.auth);
//!     let token = keys.issue(1)?;
//!     println!("Token: {}", token);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod jwt;
pub mod storage;

pub use config::Config;
pub use error::{AppError, AppResult, ERROR_CODE, SUCCESS_CODE};
pub use jwt::{Claims, JwtKeys};
pub use storage::StorageCredentials;
