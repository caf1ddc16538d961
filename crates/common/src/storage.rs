//! Object storage credentials.
//!
//! Uploads go straight from the client to a Qiniu-compatible provider. The
//! server only hands out upload tokens and verifies the callback the provider
//! sends once an object is stored. Both use HMAC-SHA1 over the secret key with
//! URL-safe base64 encoding.

use std::fmt;

use base64::{Engine, engine::general_purpose::URL_SAFE};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha1::Sha1;

use crate::{AppError, AppResult, config::StorageConfig};

type HmacSha1 = Hmac<Sha1>;

/// Scheme prefix of the provider's callback `Authorization` header.
const CALLBACK_AUTH_SCHEME: &str = "QBox ";

/// Content type whose body takes part in the callback signature.
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Body the provider posts to the callback URL. `$(x:...)` are custom
/// variables the client attaches to its upload.
const CALLBACK_BODY: &str = r#"{"key":"$(key)","is_image":"$(x:is_image)","author_id":"$(x:author_id)","video_type":"$(x:video_type)","cover_url":"$(x:cover_url)","describe":"$(x:describe)"}"#;

/// Upload policy encoded into an upload token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PutPolicy<'a> {
    scope: &'a str,
    deadline: i64,
    callback_url: &'a str,
    callback_body: &'a str,
    callback_body_type: &'a str,
}

/// Credentials shared with the object storage provider.
#[derive(Clone)]
pub struct StorageCredentials {
    access_key: String,
    secret_key: String,
    bucket: String,
    public_url: String,
    callback_url: String,
    token_ttl_secs: i64,
}

impl fmt::Debug for StorageCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageCredentials")
            .field("access_key", &self.access_key)
            .field("bucket", &self.bucket)
            .field("public_url", &self.public_url)
            .finish_non_exhaustive()
    }
}

impl StorageCredentials {
    /// Build credentials from the `[storage]` configuration section.
    #[must_use]
    pub fn from_config(config: &StorageConfig) -> Self {
        Self {
            access_key: config.access_key.clone(),
            secret_key: config.secret_key.clone(),
            bucket: config.bucket.clone(),
            public_url: config.public_url.trim_end_matches('/').to_string(),
            callback_url: config.callback_url.clone(),
            token_ttl_secs: i64::try_from(config.token_ttl_secs).unwrap_or(i64::MAX),
        }
    }

    /// Public URL of a stored object.
    #[must_use]
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_url, key)
    }

    /// Create an upload token with a callback policy.
    pub fn upload_token(&self) -> AppResult<String> {
        let policy = PutPolicy {
            scope: &self.bucket,
            deadline: Utc::now().timestamp().saturating_add(self.token_ttl_secs),
            callback_url: &self.callback_url,
            callback_body: CALLBACK_BODY,
            callback_body_type: "application/json",
        };
        let policy = serde_json::to_vec(&policy)
            .map_err(|e| AppError::Internal(format!("Failed to encode put policy: {e}")))?;
        let encoded_policy = URL_SAFE.encode(policy);
        let sign = self.sign(encoded_policy.as_bytes())?;

        Ok(format!("{}:{sign}:{encoded_policy}", self.access_key))
    }

    /// `Authorization` header value the provider sends for a callback.
    pub fn callback_authorization(
        &self,
        path_and_query: &str,
        content_type: Option<&str>,
        body: &[u8],
    ) -> AppResult<String> {
        let data = signing_data(path_and_query, content_type, body);
        let sign = self.sign(&data)?;
        Ok(format!("{CALLBACK_AUTH_SCHEME}{}:{sign}", self.access_key))
    }

    /// Check that a callback request was signed with our secret key.
    #[must_use]
    pub fn verify_callback(
        &self,
        authorization: Option<&str>,
        path_and_query: &str,
        content_type: Option<&str>,
        body: &[u8],
    ) -> bool {
        let Some(credential) = authorization.and_then(|h| h.strip_prefix(CALLBACK_AUTH_SCHEME))
        else {
            return false;
        };
        let Some((access_key, sign)) = credential.split_once(':') else {
            return false;
        };
        if access_key != self.access_key {
            return false;
        }
        let Ok(expected) = URL_SAFE.decode(sign.trim()) else {
            return false;
        };

        let Ok(mut mac) = self.mac() else {
            return false;
        };
        mac.update(&signing_data(path_and_query, content_type, body));
        mac.verify_slice(&expected).is_ok()
    }

    fn sign(&self, data: &[u8]) -> AppResult<String> {
        let mut mac = self.mac()?;
        mac.update(data);
        Ok(URL_SAFE.encode(mac.finalize().into_bytes()))
    }

    fn mac(&self) -> AppResult<HmacSha1> {
        HmacSha1::new_from_slice(self.secret_key.as_bytes())
            .map_err(|e| AppError::Internal(format!("Invalid storage secret key: {e}")))
    }
}

/// Bytes covered by a callback signature.
fn signing_data(path_and_query: &str, content_type: Option<&str>, body: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(path_and_query.len() + 1 + body.len());
    data.extend_from_slice(path_and_query.as_bytes());
    data.push(b'\n');
    let is_form = content_type
        .is_some_and(|ct| ct.trim().starts_with(FORM_CONTENT_TYPE));
    if is_form {
        data.extend_from_slice(body);
    }
    data
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn create_test_credentials() -> StorageCredentials {
        StorageCredentials::from_config(&StorageConfig {
            access_key: "test-ak".to_string(),
            secret_key: "test-sk".to_string(),
            bucket: "videos".to_string(),
            public_url: "https://cdn.example.com/".to_string(),
            callback_url: "https://api.example.com/api/v1/upload/callback".to_string(),
            token_ttl_secs: 3600,
        })
    }

    #[test]
    fn test_public_url_joins_key() {
        let creds = create_test_credentials();
        assert_eq!(creds.public_url("a/b.mp4"), "https://cdn.example.com/a/b.mp4");
    }

    #[test]
    fn test_upload_token_layout() {
        let creds = create_test_credentials();
        let token = creds.upload_token().unwrap();

        let parts: Vec<&str> = token.split(':').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "test-ak");

        let policy: serde_json::Value =
            serde_json::from_slice(&URL_SAFE.decode(parts[2]).unwrap()).unwrap();
        assert_eq!(policy["scope"], "videos");
        assert_eq!(policy["callbackBodyType"], "application/json");
        assert!(policy["deadline"].as_i64().unwrap() > Utc::now().timestamp());

        assert_eq!(parts[1], creds.sign(parts[2].as_bytes()).unwrap());
    }

    #[test]
    fn test_verify_callback_roundtrip_json() {
        let creds = create_test_credentials();
        let body = br#"{"key":"k"}"#;
        let auth = creds
            .callback_authorization("/api/v1/upload/callback", Some("application/json"), body)
            .unwrap();

        assert!(creds.verify_callback(
            Some(&auth),
            "/api/v1/upload/callback",
            Some("application/json"),
            body
        ));
    }

    #[test]
    fn test_verify_callback_form_body_is_signed() {
        let creds = create_test_credentials();
        let auth = creds
            .callback_authorization("/cb", Some(FORM_CONTENT_TYPE), b"key=a")
            .unwrap();

        assert!(creds.verify_callback(Some(&auth), "/cb", Some(FORM_CONTENT_TYPE), b"key=a"));
        assert!(!creds.verify_callback(Some(&auth), "/cb", Some(FORM_CONTENT_TYPE), b"key=b"));
    }

    #[test]
    fn test_verify_callback_rejects_bad_headers() {
        let creds = create_test_credentials();
        let auth = creds.callback_authorization("/cb", None, b"").unwrap();

        assert!(!creds.verify_callback(None, "/cb", None, b""));
        assert!(!creds.verify_callback(Some("Bearer abc"), "/cb", None, b""));
        assert!(!creds.verify_callback(Some("QBox other-ak:abc"), "/cb", None, b""));
        assert!(!creds.verify_callback(Some(&auth), "/other", None, b""));
    }
}
