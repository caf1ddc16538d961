//! Upload service.
//!
//! Clients upload straight to object storage with a token from
//! [`UploadService::upload_token`]. The provider then calls back with the
//! object key and the client's custom variables, and a video row is created
//! from that callback.

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use utopia_common::{AppError, AppResult, StorageCredentials};
use utopia_db::{
    entities::video,
    repositories::{UserRepository, VideoRepository},
};
use validator::Validate;

/// `is_image` value marking an image upload.
const IMAGE_MARKER: &str = "YES";

/// Body the storage provider posts after an upload. Every custom variable
/// arrives as a string.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UploadCallbackInput {
    #[validate(length(min = 1))]
    pub key: String,
    #[validate(length(min = 1))]
    pub is_image: String,
    pub author_id: String,
    pub video_type: String,
    pub cover_url: String,
    pub describe: String,
}

/// What a callback produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// An image: only its public URL is returned.
    Image { image_url: String },
    /// A video row was stored.
    Video(video::Model),
}

/// Upload service for business logic.
#[derive(Clone)]
pub struct UploadService {
    storage: StorageCredentials,
    video_repo: VideoRepository,
    user_repo: UserRepository,
}

impl UploadService {
    /// Create a new upload service.
    #[must_use]
    pub const fn new(
        storage: StorageCredentials,
        video_repo: VideoRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            storage,
            video_repo,
            user_repo,
        }
    }

    /// Issue an upload token for a client.
    pub fn upload_token(&self, user_id: i32) -> AppResult<String> {
        let token = self.storage.upload_token()?;
        tracing::debug!(user_id, "Issued upload token");
        Ok(token)
    }

    /// Reject callbacks not signed with our storage secret.
    pub fn verify_callback(
        &self,
        authorization: Option<&str>,
        path_and_query: &str,
        content_type: Option<&str>,
        body: &[u8],
    ) -> AppResult<()> {
        if self
            .storage
            .verify_callback(authorization, path_and_query, content_type, body)
        {
            Ok(())
        } else {
            tracing::warn!(path = path_and_query, "Rejected upload callback signature");
            Err(AppError::Signature)
        }
    }

    /// Handle a verified callback.
    pub async fn handle_callback(&self, input: UploadCallbackInput) -> AppResult<UploadOutcome> {
        input.validate()?;

        let url = self.storage.public_url(&input.key);
        if input.is_image == IMAGE_MARKER {
            return Ok(UploadOutcome::Image { image_url: url });
        }

        let author_id = parse_id(&input.author_id, "author_id")?;
        let video_type = parse_id(&input.video_type, "video_type")?;
        if input.cover_url == "null" {
            return Err(AppError::BadRequest("cover_url is required".to_string()));
        }
        self.user_repo.get_by_id(author_id).await?;

        let model = video::ActiveModel {
            author_id: Set(author_id),
            play_url: Set(url),
            cover_url: Set(input.cover_url),
            description: Set(input.describe),
            video_type: Set(video_type),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };
        let video = self.video_repo.create(model).await?;

        tracing::info!(video_id = video.id, author_id, video_type, "Stored uploaded video");
        Ok(UploadOutcome::Video(video))
    }
}

/// Parse an unsigned integer custom variable into a column value.
/// Only plain ASCII digits are accepted: no sign, no whitespace.
fn parse_id(raw: &str, field: &str) -> AppResult<i32> {
    let invalid = || AppError::BadRequest(format!("{field} must be an unsigned integer"));
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    raw.parse::<u32>()
        .ok()
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(invalid)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;
    use utopia_common::config::StorageConfig;
    use utopia_db::entities::user;

    fn create_test_storage() -> StorageCredentials {
        StorageCredentials::from_config(&StorageConfig {
            access_key: "ak".to_string(),
            secret_key: "sk".to_string(),
            bucket: "videos".to_string(),
            public_url: "https://cdn.example.com".to_string(),
            callback_url: "https://api.example.com/api/v1/upload/callback".to_string(),
            token_ttl_secs: 3600,
        })
    }

    fn create_test_service(video_db: MockDatabase, user_db: MockDatabase) -> UploadService {
        UploadService::new(
            create_test_storage(),
            VideoRepository::new(Arc::new(video_db.into_connection())),
            UserRepository::new(Arc::new(user_db.into_connection())),
        )
    }

    fn create_test_input(is_image: &str, author_id: &str) -> UploadCallbackInput {
        UploadCallbackInput {
            key: "2025/clip.mp4".to_string(),
            is_image: is_image.to_string(),
            author_id: author_id.to_string(),
            video_type: "3".to_string(),
            cover_url: "https://cdn.example.com/cover.jpg".to_string(),
            describe: "sunset".to_string(),
        }
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42", "author_id").unwrap(), 42);
        assert!(parse_id("abc", "author_id").is_err());
        assert!(parse_id("-1", "author_id").is_err());
        assert!(parse_id("4294967295", "author_id").is_err());
        assert!(parse_id("+7", "author_id").is_err());
        assert!(parse_id(" 7 ", "author_id").is_err());
        assert!(parse_id("", "author_id").is_err());
        assert_eq!(parse_id("007", "video_type").unwrap(), 7);
    }

    #[tokio::test]
    async fn test_image_callback_stores_nothing() {
        // No results appended: any query would fail.
        let service = create_test_service(
            MockDatabase::new(DatabaseBackend::Postgres),
            MockDatabase::new(DatabaseBackend::Postgres),
        );

        let outcome = service
            .handle_callback(create_test_input("YES", "abc"))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            UploadOutcome::Image {
                image_url: "https://cdn.example.com/2025/clip.mp4".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_non_numeric_author_is_rejected() {
        let service = create_test_service(
            MockDatabase::new(DatabaseBackend::Postgres),
            MockDatabase::new(DatabaseBackend::Postgres),
        );

        let result = service.handle_callback(create_test_input("NO", "abc")).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_null_cover_is_rejected() {
        let service = create_test_service(
            MockDatabase::new(DatabaseBackend::Postgres),
            MockDatabase::new(DatabaseBackend::Postgres),
        );

        let mut input = create_test_input("NO", "1");
        input.cover_url = "null".to_string();

        assert!(service.handle_callback(input).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_key_fails_validation() {
        let service = create_test_service(
            MockDatabase::new(DatabaseBackend::Postgres),
            MockDatabase::new(DatabaseBackend::Postgres),
        );

        let mut input = create_test_input("YES", "1");
        input.key = String::new();

        assert!(matches!(
            service.handle_callback(input).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_video_callback_persists_row() {
        let now = Utc::now();
        let author = user::Model {
            id: 1,
            username: "alice".to_string(),
            password_hash: String::new(),
            nickname: "alice".to_string(),
            avatar_url: None,
            created_at: now.into(),
            updated_at: now.into(),
        };
        let stored = video::Model {
            id: 11,
            author_id: 1,
            play_url: "https://cdn.example.com/2025/clip.mp4".to_string(),
            cover_url: "https://cdn.example.com/cover.jpg".to_string(),
            description: "sunset".to_string(),
            video_type: 3,
            created_at: now.into(),
        };
        let service = create_test_service(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[stored.clone()]]),
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[author]]),
        );

        let outcome = service
            .handle_callback(create_test_input("NO", "1"))
            .await
            .unwrap();

        assert_eq!(outcome, UploadOutcome::Video(stored));
    }

    #[test]
    fn test_verify_callback_maps_to_signature_error() {
        let service = create_test_service(
            MockDatabase::new(DatabaseBackend::Postgres),
            MockDatabase::new(DatabaseBackend::Postgres),
        );

        let result = service.verify_callback(Some("QBox ak:bogus"), "/cb", None, b"");
        assert!(matches!(result, Err(AppError::Signature)));

        let auth = create_test_storage()
            .callback_authorization("/cb", None, b"")
            .unwrap();
        assert!(service.verify_callback(Some(&auth), "/cb", None, b"").is_ok());
    }
}
