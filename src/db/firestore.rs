// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper implementing the profile store.
//!
//! Profiles live in the `users` collection with the identity ID as the
//! document ID. Partial updates send an update mask so fields outside the
//! patch are never touched.

use crate::db::{collections, ProfileStore};
use crate::error::StoreError;
use crate::models::{Profile, ProfilePatch};
use async_trait::async_trait;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, StoreError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| StoreError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, StoreError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            StoreError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, StoreError> {
        self.client
            .as_ref()
            .ok_or_else(|| StoreError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Profile Operations ──────────────────────────────────────

    /// Get a profile by identity ID.
    pub async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, StoreError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    /// Write the whole profile document, replacing any existing one.
    pub async fn set_profile(&self, user_id: &str, profile: &Profile) -> Result<(), StoreError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(user_id)
            .object(profile)
            .execute()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }

    /// Write only the fields named by `patch`.
    ///
    /// Firestore creates the document when it does not exist yet.
    pub async fn patch_profile(&self, user_id: &str, patch: &ProfilePatch) -> Result<(), StoreError> {
        if patch.is_empty() {
            return Ok(());
        }

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(patch.field_paths())
            .in_col(collections::USERS)
            .document_id(user_id)
            .object(patch)
            .execute()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a profile document.
    ///
    /// The reconcilers never delete profiles; this exists for test cleanup.
    pub async fn delete_profile(&self, user_id: &str) -> Result<(), StoreError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::USERS)
            .document_id(user_id)
            .execute()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for FirestoreDb {
    async fn create(&self, user_id: &str, profile: &Profile) -> Result<(), StoreError> {
        self.set_profile(user_id, profile).await?;
        tracing::debug!(user_id, "Profile document created");
        Ok(())
    }

    async fn get(&self, user_id: &str) -> Result<Profile, StoreError> {
        self.get_profile(user_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("Profile {}", user_id)))
    }

    async fn update_fields(&self, user_id: &str, patch: &ProfilePatch) -> Result<(), StoreError> {
        self.patch_profile(user_id, patch).await?;
        tracing::debug!(user_id, fields = ?patch.field_paths(), "Profile fields updated");
        Ok(())
    }

    async fn exists(&self, user_id: &str) -> bool {
        match self.get_profile(user_id).await {
            Ok(found) => found.is_some(),
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Profile existence check failed");
                false
            }
        }
    }
}
