// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile document store (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

use crate::error::StoreError;
use crate::models::{Profile, ProfilePatch};
use async_trait::async_trait;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
}

/// Remote store of profile documents keyed by identity ID.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Write a complete profile document.
    async fn create(&self, user_id: &str, profile: &Profile) -> Result<(), StoreError>;

    /// Fetch a profile; a missing document is [`StoreError::NotFound`].
    async fn get(&self, user_id: &str) -> Result<Profile, StoreError>;

    /// Merge `patch` into the document, creating it if absent.
    async fn update_fields(&self, user_id: &str, patch: &ProfilePatch) -> Result<(), StoreError>;

    /// Whether a profile document exists. Read failures count as `false`.
    async fn exists(&self, user_id: &str) -> bool;
}
