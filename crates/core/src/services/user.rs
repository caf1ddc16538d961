//! User service.

use std::collections::HashMap;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use sea_orm::{Set, prelude::DateTimeWithTimeZone};
use serde::{Deserialize, Serialize};
use utopia_common::{AppError, AppResult, JwtKeys};
use utopia_db::{entities::user, repositories::UserRepository};
use validator::Validate;

/// Login failures never say which half was wrong.
const BAD_CREDENTIALS: &str = "incorrect username or password";

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    keys: JwtKeys,
}

/// Input for registering a new user.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    #[serde(default)]
    #[validate(length(min = 3, max = 32))]
    pub username: String,

    #[serde(default)]
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Input for logging in.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginInput {
    #[serde(default)]
    #[validate(length(min = 1, max = 32))]
    pub username: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Input for changing the display name.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateNicknameInput {
    #[serde(default)]
    #[validate(length(min = 1, max = 32))]
    pub nickname: String,
}

/// A user ID with a freshly issued bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct AuthOutput {
    pub user_id: i32,
    pub token: String,
}

/// Public view of a user, used in follow lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: i32,
    pub nickname: String,
    pub avatar_url: Option<String>,
}

impl From<user::Model> for UserSummary {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            nickname: user.nickname,
            avatar_url: user.avatar_url,
        }
    }
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository, keys: JwtKeys) -> Self {
        Self { user_repo, keys }
    }

    /// Register a user and log them in.
    pub async fn register(&self, input: RegisterInput) -> AppResult<AuthOutput> {
        input.validate()?;

        if self
            .user_repo
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("username already taken".to_string()));
        }

        let password_hash = hash_password(&input.password)?;
        let now: DateTimeWithTimeZone = Utc::now().into();
        let model = user::ActiveModel {
            username: Set(input.username.clone()),
            password_hash: Set(password_hash),
            nickname: Set(input.username),
            avatar_url: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let user = self.user_repo.create(model).await?;
        tracing::info!(user_id = user.id, username = %user.username, "Registered user");

        Ok(AuthOutput {
            user_id: user.id,
            token: self.keys.issue(user.id)?,
        })
    }

    /// Check credentials and issue a token.
    pub async fn login(&self, input: LoginInput) -> AppResult<AuthOutput> {
        input.validate()?;

        let Some(user) = self.user_repo.find_by_username(&input.username).await? else {
            return Err(AppError::BadRequest(BAD_CREDENTIALS.to_string()));
        };

        if !verify_password(&input.password, &user.password_hash)? {
            return Err(AppError::BadRequest(BAD_CREDENTIALS.to_string()));
        }

        Ok(AuthOutput {
            user_id: user.id,
            token: self.keys.issue(user.id)?,
        })
    }

    /// Change a user's nickname.
    pub async fn update_nickname(
        &self,
        user_id: i32,
        input: UpdateNicknameInput,
    ) -> AppResult<user::Model> {
        input.validate()?;

        let user = self.user_repo.get_by_id(user_id).await?;
        let mut active: user::ActiveModel = user.into();
        active.nickname = Set(input.nickname);
        active.updated_at = Set(Utc::now().into());

        self.user_repo.update(active).await
    }

    /// Summaries for `ids`, in the same order. Unknown IDs are skipped.
    pub async fn summaries(&self, ids: &[i32]) -> AppResult<Vec<UserSummary>> {
        let mut by_id: HashMap<i32, user::Model> = self
            .user_repo
            .find_by_ids(ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(ids
            .iter()
            .filter_map(|id| by_id.remove(id))
            .map(UserSummary::from)
            .collect())
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
