// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Binary asset storage for profile pictures.

use crate::error::StoreError;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

/// Folder profile pictures are stored under.
pub const PROFILE_PICTURES: &str = "profiles";

/// Storage key for a user's profile picture.
pub fn profile_picture_key(user_id: &str) -> String {
    format!("{}/{}.jpg", PROFILE_PICTURES, user_id)
}

/// Remote blob store.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Store `data` under `key`, replacing any previous object.
    async fn put(&self, key: &str, data: &[u8]) -> Result<(), StoreError>;

    /// Stable URL the stored object can be fetched from.
    async fn retrieval_url(&self, key: &str) -> Result<String, StoreError>;
}

/// Supplies the bearer token for storage requests.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, StoreError>;
}

/// Firebase Storage client (REST API).
#[derive(Clone)]
pub struct FirebaseStorageAssets {
    http: reqwest::Client,
    base_url: String,
    bucket: String,
    content_type: String,
    auth: Arc<dyn AccessTokenProvider>,
}

impl FirebaseStorageAssets {
    /// Create a client for `bucket`, authenticating with the signed-in user.
    pub fn new(base_url: &str, bucket: &str, auth: Arc<dyn AccessTokenProvider>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
            content_type: "image/jpeg".to_string(),
            auth,
        }
    }

    /// Object URL for `key` (the key is one path segment, slashes encoded).
    fn object_url(&self, key: &str) -> String {
        format!(
            "{}/b/{}/o/{}",
            self.base_url,
            self.bucket,
            urlencoding::encode(key)
        )
    }

    /// Check response status and return error if not successful.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, StoreError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 404 {
                return Err(StoreError::NotFound(body));
            }
            return Err(StoreError::Asset(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| StoreError::Asset(format!("JSON parse error: {}", e)))
    }
}

#[async_trait]
impl AssetStore for FirebaseStorageAssets {
    async fn put(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        let token = self.auth.access_token().await?;
        let url = format!("{}/b/{}/o", self.base_url, self.bucket);

        let response = self
            .http
            .post(&url)
            .query(&[("uploadType", "media"), ("name", key)])
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, self.content_type.as_str())
            .body(data.to_vec())
            .send()
            .await
            .map_err(|e| StoreError::Asset(format!("Upload request failed: {}", e)))?;

        let metadata: ObjectMetadata = self.check_response_json(response).await?;
        tracing::debug!(key, size = data.len(), object = %metadata.name, "Asset uploaded");
        Ok(())
    }

    async fn retrieval_url(&self, key: &str) -> Result<String, StoreError> {
        let token = self.auth.access_token().await?;
        let object_url = self.object_url(key);

        let response = self
            .http
            .get(&object_url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| StoreError::Asset(format!("Metadata request failed: {}", e)))?;

        let metadata: ObjectMetadata = self.check_response_json(response).await?;
        let download_token = metadata
            .download_tokens
            .as_deref()
            .and_then(|tokens| tokens.split(',').next())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| StoreError::Asset(format!("No download token for {}", key)))?;

        Ok(format!(
            "{}?alt=media&token={}",
            object_url,
            urlencoding::encode(download_token)
        ))
    }
}

/// Subset of the Firebase Storage object resource.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectMetadata {
    name: String,
    #[serde(default)]
    download_tokens: Option<String>,
}
