// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile loading, editing and picture upload.
//!
//! Keeps the observable profile snapshot and the cached display name in
//! step with the remote document. A failed operation never touches either.

use crate::cache::SessionCache;
use crate::db::ProfileStore;
use crate::error::StoreError;
use crate::models::{Profile, ProfilePatch};
use crate::services::busy::BusyGuard;
use crate::services::storage::{profile_picture_key, AssetStore};
use crate::time_utils::Clock;
use crate::validation::{self, ValidationErrors};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const NOT_LOGGED_IN: &str = "User not logged in";

/// Terminal result of one profile operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "value")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ProfileOutcome {
    Idle,
    Loaded,
    Updated,
    PictureUploaded(String),
    Error(String),
}

/// Drives profile reads and writes for the signed-in user.
pub struct ProfileReconciler {
    profiles: Arc<dyn ProfileStore>,
    assets: Arc<dyn AssetStore>,
    cache: Arc<dyn SessionCache>,
    clock: Arc<dyn Clock>,
    state: watch::Sender<ProfileOutcome>,
    profile: watch::Sender<Option<Profile>>,
    busy: watch::Sender<bool>,
}

impl ProfileReconciler {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        assets: Arc<dyn AssetStore>,
        cache: Arc<dyn SessionCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (state, _) = watch::channel(ProfileOutcome::Idle);
        let (profile, _) = watch::channel(None);
        let (busy, _) = watch::channel(false);
        Self {
            profiles,
            assets,
            cache,
            clock,
            state,
            profile,
            busy,
        }
    }

    // ─── Observation ─────────────────────────────────────────────

    pub fn outcomes(&self) -> watch::Receiver<ProfileOutcome> {
        self.state.subscribe()
    }

    /// Last successfully loaded profile.
    pub fn profiles(&self) -> watch::Receiver<Option<Profile>> {
        self.profile.subscribe()
    }

    pub fn busy(&self) -> watch::Receiver<bool> {
        self.busy.subscribe()
    }

    pub fn current_profile(&self) -> Option<Profile> {
        self.profile.borrow().clone()
    }

    pub fn current_user_id(&self) -> Option<String> {
        self.cache.user_id()
    }

    /// Reset the observable outcome to `Idle`.
    pub fn clear(&self) {
        self.state.send_replace(ProfileOutcome::Idle);
    }

    fn publish(&self, outcome: ProfileOutcome) -> ProfileOutcome {
        self.state.send_replace(outcome.clone());
        outcome
    }

    // ─── Load ────────────────────────────────────────────────────

    /// Fetch a profile and make it the current snapshot.
    ///
    /// On failure the previous snapshot stays in place.
    pub async fn load(&self, user_id: &str) -> ProfileOutcome {
        let _busy = BusyGuard::begin(&self.busy);

        let outcome = match self.fetch(user_id).await {
            Ok(()) => ProfileOutcome::Loaded,
            Err(e) => ProfileOutcome::Error(load_error_message(&e)),
        };

        self.publish(outcome)
    }

    /// Load the profile of the user in the session cache.
    pub async fn load_current(&self) -> ProfileOutcome {
        match self.cache.user_id() {
            Some(user_id) => self.load(&user_id).await,
            None => self.publish(ProfileOutcome::Error(NOT_LOGGED_IN.to_string())),
        }
    }

    async fn fetch(&self, user_id: &str) -> Result<(), StoreError> {
        let profile = self.profiles.get(user_id).await?;
        self.profile.send_replace(Some(profile));
        Ok(())
    }

    /// Re-read after a successful write so server-side defaults show up.
    ///
    /// The write already succeeded, so a failed read only logs.
    async fn refresh(&self, user_id: &str) {
        if let Err(e) = self.fetch(user_id).await {
            tracing::warn!(user_id, error = %e, "Profile refresh after write failed");
        }
    }

    // ─── Update ──────────────────────────────────────────────────

    /// Save the editable profile fields.
    ///
    /// Only name, bio, campus and the last-active time are written. Campus
    /// is passed through unchecked.
    pub async fn update(
        &self,
        name: &str,
        bio: &str,
        campus: &str,
    ) -> Result<ProfileOutcome, ValidationErrors> {
        validation::validate_profile_edit(name, bio).into_result()?;

        let Some(user_id) = self.cache.user_id() else {
            return Ok(self.publish(ProfileOutcome::Error(NOT_LOGGED_IN.to_string())));
        };

        let _busy = BusyGuard::begin(&self.busy);
        let name = name.trim();
        let patch = ProfilePatch::edit(name, bio.trim(), campus.trim(), self.clock.now());

        let outcome = match self.profiles.update_fields(&user_id, &patch).await {
            Ok(()) => {
                if let Err(e) = self.cache.update_name(name) {
                    tracing::error!(user_id = %user_id, error = %e, "Failed to update cached name");
                }
                self.refresh(&user_id).await;
                tracing::info!(user_id = %user_id, "Profile updated");
                ProfileOutcome::Updated
            }
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "Profile update failed");
                ProfileOutcome::Error(format!("Failed to update profile: {}", e))
            }
        };

        Ok(self.publish(outcome))
    }

    // ─── Profile Picture ─────────────────────────────────────────

    /// Upload a new profile picture and point the profile at it.
    ///
    /// If the document write fails after the upload, the stored object is
    /// left behind unreferenced.
    pub async fn upload_picture(&self, image: &[u8]) -> ProfileOutcome {
        let Some(user_id) = self.cache.user_id() else {
            return self.publish(ProfileOutcome::Error(NOT_LOGGED_IN.to_string()));
        };

        let _busy = BusyGuard::begin(&self.busy);

        match self.store_picture(&user_id, image).await {
            Ok(url) => {
                tracing::info!(user_id = %user_id, "Profile picture uploaded");
                let outcome = self.publish(ProfileOutcome::PictureUploaded(url));
                self.refresh(&user_id).await;
                outcome
            }
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "Profile picture upload failed");
                self.publish(ProfileOutcome::Error(format!(
                    "Failed to upload photo: {}",
                    e
                )))
            }
        }
    }

    async fn store_picture(&self, user_id: &str, image: &[u8]) -> Result<String, StoreError> {
        let key = profile_picture_key(user_id);
        self.assets.put(&key, image).await?;
        let url = self.assets.retrieval_url(&key).await?;
        self.profiles
            .update_fields(user_id, &ProfilePatch::picture(&url))
            .await?;
        Ok(url)
    }

    // ─── Activity ────────────────────────────────────────────────

    /// Touch `lastActiveAt` for the cached user.
    ///
    /// Best-effort: the outcome and snapshot are left alone, and callers may
    /// log the error but should not surface it.
    pub async fn record_activity(&self) -> Result<(), StoreError> {
        let user_id = self
            .cache
            .user_id()
            .ok_or_else(|| StoreError::NotFound(NOT_LOGGED_IN.to_string()))?;

        self.profiles
            .update_fields(&user_id, &ProfilePatch::last_active(self.clock.now()))
            .await
    }
}

fn load_error_message(err: &StoreError) -> String {
    match err {
        StoreError::NotFound(_) => "User profile not found.".to_string(),
        other => format!("Failed to load profile: {}", other),
    }
}
