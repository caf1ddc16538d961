//! Core business logic for utopia.
//!
//! Services sit between the HTTP layer and the repositories. They take the
//! caller's identity as an explicit `user_id` argument and never see
//! transport types.

pub mod pagination;
pub mod services;

pub use pagination::{Page, PageRequest};
pub use services::*;
