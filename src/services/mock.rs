// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory collaborators for testing (offline mode).
//!
//! Only available in debug/test builds. Each mock counts its calls and can
//! be told to fail a given call until told otherwise.

use crate::db::ProfileStore;
use crate::error::{ProviderError, StoreError};
use crate::models::{Identity, Profile, ProfilePatch};
use crate::services::identity::IdentityProvider;
use crate::services::storage::AssetStore;
use async_trait::async_trait;
use dashmap::DashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

/// Call counters and injected failures, keyed by call kind.
struct Script<K: Eq + Hash, E> {
    calls: DashMap<K, usize>,
    failures: DashMap<K, E>,
}

impl<K: Eq + Hash + Copy, E: Clone> Script<K, E> {
    fn new() -> Self {
        Self {
            calls: DashMap::new(),
            failures: DashMap::new(),
        }
    }

    /// Record a call and return the injected failure, if any.
    fn enter(&self, call: K) -> Result<(), E> {
        *self.calls.entry(call).or_insert(0) += 1;
        match self.failures.get(&call) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn count(&self, call: K) -> usize {
        self.calls.get(&call).map(|c| *c).unwrap_or(0)
    }
}

// ─── Identity Provider ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityCall {
    SignUp,
    SignIn,
    SignOut,
    PasswordReset,
    VerificationEmail,
    Reload,
}

#[derive(Debug, Clone)]
struct MockAccount {
    id: String,
    password: String,
    email_verified: bool,
}

/// Identity provider backed by an in-memory account table.
pub struct MockIdentityProvider {
    accounts: DashMap<String, MockAccount>,
    current: RwLock<Option<String>>,
    next_id: AtomicUsize,
    script: Script<IdentityCall, ProviderError>,
}

impl Default for MockIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            current: RwLock::new(None),
            next_id: AtomicUsize::new(1),
            script: Script::new(),
        }
    }

    /// Register an account directly and return its identity ID.
    pub fn add_account(&self, email: &str, password: &str, email_verified: bool) -> String {
        let id = format!("u{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.accounts.insert(
            email.to_string(),
            MockAccount {
                id: id.clone(),
                password: password.to_string(),
                email_verified,
            },
        );
        id
    }

    /// Flip the verification flag, as clicking the emailed link would.
    pub fn set_verified(&self, email: &str, verified: bool) {
        if let Some(mut account) = self.accounts.get_mut(email) {
            account.email_verified = verified;
        }
    }

    /// Make `call` fail with `err` until [`Self::succeed`] is called.
    pub fn fail(&self, call: IdentityCall, err: ProviderError) {
        self.script.failures.insert(call, err);
    }

    pub fn succeed(&self, call: IdentityCall) {
        self.script.failures.remove(&call);
    }

    pub fn calls(&self, call: IdentityCall) -> usize {
        self.script.count(call)
    }

    /// Total calls of every kind.
    pub fn total_calls(&self) -> usize {
        self.script.calls.iter().map(|c| *c.value()).sum()
    }

    fn identity_for(&self, email: &str) -> Option<Identity> {
        self.accounts.get(email).map(|account| Identity {
            id: account.id.clone(),
            email: email.to_string(),
            email_verified: account.email_verified,
        })
    }

    fn set_current(&self, email: Option<&str>) {
        if let Ok(mut current) = self.current.write() {
            *current = email.map(str::to_string);
        }
    }

    fn current_email(&self) -> Option<String> {
        self.current.read().ok().and_then(|c| c.clone())
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, ProviderError> {
        self.script.enter(IdentityCall::SignUp)?;
        if self.accounts.contains_key(email) {
            return Err(ProviderError::EmailTaken);
        }

        self.add_account(email, password, false);
        self.set_current(Some(email));
        self.identity_for(email)
            .ok_or_else(|| ProviderError::Unknown("account vanished".to_string()))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, ProviderError> {
        self.script.enter(IdentityCall::SignIn)?;
        let account = self
            .accounts
            .get(email)
            .map(|a| a.clone())
            .ok_or(ProviderError::NoSuchUser)?;
        if account.password != password {
            return Err(ProviderError::BadCredentials);
        }

        self.set_current(Some(email));
        self.identity_for(email)
            .ok_or_else(|| ProviderError::Unknown("account vanished".to_string()))
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        self.script.enter(IdentityCall::SignOut)?;
        self.set_current(None);
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), ProviderError> {
        self.script.enter(IdentityCall::PasswordReset)?;
        if !self.accounts.contains_key(email) {
            return Err(ProviderError::NoSuchUser);
        }
        Ok(())
    }

    async fn send_verification_email(&self) -> Result<(), ProviderError> {
        self.script.enter(IdentityCall::VerificationEmail)?;
        self.current_email()
            .map(|_| ())
            .ok_or(ProviderError::NoCurrentUser)
    }

    async fn reload(&self) -> Result<Identity, ProviderError> {
        self.script.enter(IdentityCall::Reload)?;
        let email = self.current_email().ok_or(ProviderError::NoCurrentUser)?;
        self.identity_for(&email).ok_or(ProviderError::NoSuchUser)
    }

    async fn current_identity(&self) -> Option<Identity> {
        self.current_email().and_then(|email| self.identity_for(&email))
    }
}

// ─── Profile Store ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreCall {
    Create,
    Get,
    UpdateFields,
    Exists,
}

/// Profile store backed by a map of documents.
pub struct MockProfileStore {
    docs: DashMap<String, Profile>,
    script: Script<StoreCall, StoreError>,
}

impl Default for MockProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProfileStore {
    pub fn new() -> Self {
        Self {
            docs: DashMap::new(),
            script: Script::new(),
        }
    }

    pub fn insert(&self, profile: Profile) {
        self.docs.insert(profile.user_id.clone(), profile);
    }

    /// Stored document, read without counting as a call.
    pub fn document(&self, user_id: &str) -> Option<Profile> {
        self.docs.get(user_id).map(|p| p.clone())
    }

    pub fn fail(&self, call: StoreCall, err: StoreError) {
        self.script.failures.insert(call, err);
    }

    pub fn succeed(&self, call: StoreCall) {
        self.script.failures.remove(&call);
    }

    pub fn calls(&self, call: StoreCall) -> usize {
        self.script.count(call)
    }

    pub fn total_calls(&self) -> usize {
        self.script.calls.iter().map(|c| *c.value()).sum()
    }
}

#[async_trait]
impl ProfileStore for MockProfileStore {
    async fn create(&self, user_id: &str, profile: &Profile) -> Result<(), StoreError> {
        self.script.enter(StoreCall::Create)?;
        self.docs.insert(user_id.to_string(), profile.clone());
        Ok(())
    }

    async fn get(&self, user_id: &str) -> Result<Profile, StoreError> {
        self.script.enter(StoreCall::Get)?;
        self.document(user_id)
            .ok_or_else(|| StoreError::NotFound(format!("Profile {}", user_id)))
    }

    async fn update_fields(&self, user_id: &str, patch: &ProfilePatch) -> Result<(), StoreError> {
        self.script.enter(StoreCall::UpdateFields)?;
        let mut doc = self.docs.entry(user_id.to_string()).or_insert_with(|| Profile {
            user_id: user_id.to_string(),
            ..Profile::default()
        });
        patch.apply_to(&mut doc);
        Ok(())
    }

    async fn exists(&self, user_id: &str) -> bool {
        match self.script.enter(StoreCall::Exists) {
            Ok(()) => self.docs.contains_key(user_id),
            Err(_) => false,
        }
    }
}

// ─── Asset Store ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetCall {
    Put,
    RetrievalUrl,
}

/// Asset store that keeps uploaded bytes in memory.
pub struct MockAssetStore {
    objects: DashMap<String, Vec<u8>>,
    script: Script<AssetCall, StoreError>,
}

impl Default for MockAssetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAssetStore {
    pub const BASE_URL: &'static str = "https://assets.test";

    pub fn new() -> Self {
        Self {
            objects: DashMap::new(),
            script: Script::new(),
        }
    }

    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.get(key).map(|o| o.clone())
    }

    pub fn fail(&self, call: AssetCall, err: StoreError) {
        self.script.failures.insert(call, err);
    }

    pub fn succeed(&self, call: AssetCall) {
        self.script.failures.remove(&call);
    }

    pub fn calls(&self, call: AssetCall) -> usize {
        self.script.count(call)
    }
}

#[async_trait]
impl AssetStore for MockAssetStore {
    async fn put(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        self.script.enter(AssetCall::Put)?;
        self.objects.insert(key.to_string(), data.to_vec());
        Ok(())
    }

    async fn retrieval_url(&self, key: &str) -> Result<String, StoreError> {
        self.script.enter(AssetCall::RetrievalUrl)?;
        if !self.objects.contains_key(key) {
            return Err(StoreError::NotFound(key.to_string()));
        }
        Ok(format!("{}/{}?alt=media", Self::BASE_URL, key))
    }
}
