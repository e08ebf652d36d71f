// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session reconciliation across the identity provider, the profile store
//! and the local session cache.
//!
//! Every operation runs its remote calls strictly in sequence and ends in
//! exactly one [`AuthOutcome`]. The cache is only written after the provider
//! has accepted the credentials, and it is written before the outcome is
//! reported.

use crate::cache::SessionCache;
use crate::db::ProfileStore;
use crate::error::{ProviderError, StoreError};
use crate::models::{Identity, Profile};
use crate::services::busy::BusyGuard;
use crate::services::identity::IdentityProvider;
use crate::time_utils::Clock;
use crate::validation::{self, ValidationErrors};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Terminal result of one authentication operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "value")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum AuthOutcome {
    Idle,
    Authenticated(String),
    SignedUp(String),
    ProfileIncomplete(String),
    EmailNotVerified,
    VerificationEmailSent,
    PasswordResetSent,
    Error(String),
}

impl AuthOutcome {
    fn from_provider(err: &ProviderError) -> Self {
        AuthOutcome::Error(err.user_message())
    }
}

/// Where the app should start, decided from the local cache alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootRoute {
    Home { user_id: String },
    Login,
}

/// Drives sign-up, sign-in, verification, password reset and logout.
pub struct SessionReconciler {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileStore>,
    cache: Arc<dyn SessionCache>,
    clock: Arc<dyn Clock>,
    state: watch::Sender<AuthOutcome>,
    busy: watch::Sender<bool>,
}

impl SessionReconciler {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        profiles: Arc<dyn ProfileStore>,
        cache: Arc<dyn SessionCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (state, _) = watch::channel(AuthOutcome::Idle);
        let (busy, _) = watch::channel(false);
        Self {
            identity,
            profiles,
            cache,
            clock,
            state,
            busy,
        }
    }

    // ─── Observation ─────────────────────────────────────────────

    /// Latest outcome, updated as each operation finishes.
    pub fn outcomes(&self) -> watch::Receiver<AuthOutcome> {
        self.state.subscribe()
    }

    pub fn busy(&self) -> watch::Receiver<bool> {
        self.busy.subscribe()
    }

    pub fn current_outcome(&self) -> AuthOutcome {
        self.state.borrow().clone()
    }

    /// Reset the observable outcome to `Idle`.
    pub fn clear(&self) {
        self.state.send_replace(AuthOutcome::Idle);
    }

    fn publish(&self, outcome: AuthOutcome) -> AuthOutcome {
        self.state.send_replace(outcome.clone());
        outcome
    }

    // ─── Sign In ─────────────────────────────────────────────────

    /// Sign in with email and password.
    ///
    /// Invalid input is returned as `Err` without contacting anything.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthOutcome, ValidationErrors> {
        validation::validate_sign_in(email, password).into_result()?;

        let _busy = BusyGuard::begin(&self.busy);
        let email = email.trim();

        let outcome = match self.identity.sign_in(email, password).await {
            Ok(identity) => self.after_sign_in(identity, email).await,
            Err(e) => {
                tracing::info!(error = %e, "Sign-in rejected by provider");
                AuthOutcome::from_provider(&e)
            }
        };

        Ok(self.publish(outcome))
    }

    async fn after_sign_in(&self, identity: Identity, email: &str) -> AuthOutcome {
        // Unverified accounts must not learn whether a profile exists
        if !identity.email_verified {
            tracing::info!(user_id = %identity.id, "Sign-in blocked on email verification");
            return AuthOutcome::EmailNotVerified;
        }

        let user_id = identity.id;

        if !self.profiles.exists(&user_id).await {
            self.save_session(&user_id, "", email);
            self.mark_profile_complete(false);
            tracing::info!(user_id = %user_id, "Signed in without a profile");
            return AuthOutcome::ProfileIncomplete(user_id);
        }

        match self.profiles.get(&user_id).await {
            Ok(profile) => {
                self.save_session(&user_id, &profile.name, &profile.email);
                self.mark_profile_complete(true);
                tracing::info!(user_id = %user_id, "Signed in");
            }
            Err(e) => {
                // Availability over consistency: the profile exists but
                // could not be read right now.
                tracing::warn!(user_id = %user_id, error = %e, "Profile unreadable at sign-in");
                self.save_session(&user_id, "", email);
            }
        }

        AuthOutcome::Authenticated(user_id)
    }

    // ─── Sign Up ─────────────────────────────────────────────────

    /// Create an account, then best-effort create its profile and send the
    /// verification email.
    ///
    /// Once the identity exists the outcome is always `SignedUp`; the
    /// identity is never rolled back.
    pub async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<AuthOutcome, ValidationErrors> {
        validation::validate_sign_up(name, email, password, confirm_password).into_result()?;

        let _busy = BusyGuard::begin(&self.busy);
        let name = name.trim();
        let email = email.trim();

        let identity = match self.identity.sign_up(email, password).await {
            Ok(identity) => identity,
            Err(e) => {
                tracing::info!(error = %e, "Sign-up rejected by provider");
                return Ok(self.publish(AuthOutcome::from_provider(&e)));
            }
        };

        let profile = Profile::new(&identity.id, email, name, self.clock.now());
        let profile_created = self.create_profile(&profile).await.is_ok();
        // Failure is logged inside; "resend verification" is the retry
        let _ = self.send_verification().await;

        self.save_session(&identity.id, name, email);
        self.mark_profile_complete(profile_created);

        tracing::info!(user_id = %identity.id, profile_created, "Signed up");
        Ok(self.publish(AuthOutcome::SignedUp(identity.id)))
    }

    /// Best-effort profile creation; the error is for logging only.
    async fn create_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        self.profiles
            .create(&profile.user_id, profile)
            .await
            .inspect_err(|e| {
                tracing::warn!(user_id = %profile.user_id, error = %e, "Profile creation failed");
            })
    }

    /// Best-effort verification email; the error is for logging only.
    async fn send_verification(&self) -> Result<(), ProviderError> {
        self.identity
            .send_verification_email()
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Verification email not sent"))
    }

    // ─── Email Verification ──────────────────────────────────────

    pub async fn resend_verification_email(&self) -> AuthOutcome {
        let _busy = BusyGuard::begin(&self.busy);

        let outcome = match self.identity.send_verification_email().await {
            Ok(()) => AuthOutcome::VerificationEmailSent,
            Err(e) => AuthOutcome::from_provider(&e),
        };

        self.publish(outcome)
    }

    /// Reload the identity from the provider and decide on its fresh
    /// verification flag.
    pub async fn check_email_verification(&self) -> AuthOutcome {
        let _busy = BusyGuard::begin(&self.busy);

        let outcome = match self.identity.reload().await {
            Ok(identity) if identity.email_verified => {
                let name = self.cache.name().unwrap_or_default();
                self.save_session(&identity.id, &name, &identity.email);
                tracing::info!(user_id = %identity.id, "Email verified");
                AuthOutcome::Authenticated(identity.id)
            }
            Ok(_) => AuthOutcome::EmailNotVerified,
            Err(e) => AuthOutcome::from_provider(&e),
        };

        self.publish(outcome)
    }

    // ─── Password Reset ──────────────────────────────────────────

    pub async fn send_password_reset(&self, email: &str) -> Result<AuthOutcome, ValidationErrors> {
        validation::validate_password_reset(email).into_result()?;

        let _busy = BusyGuard::begin(&self.busy);

        let outcome = match self.identity.send_password_reset(email.trim()).await {
            Ok(()) => AuthOutcome::PasswordResetSent,
            Err(e) => AuthOutcome::from_provider(&e),
        };

        Ok(self.publish(outcome))
    }

    // ─── Logout ──────────────────────────────────────────────────

    /// Sign out and wipe the local session. Never fails.
    pub async fn logout(&self) -> AuthOutcome {
        if let Err(e) = self.identity.sign_out().await {
            tracing::warn!(error = %e, "Provider sign-out failed; clearing local session anyway");
        }

        if let Err(e) = self.cache.clear() {
            tracing::error!(error = %e, "Failed to clear session cache");
        }

        tracing::info!("Logged out");
        self.publish(AuthOutcome::Idle)
    }

    // ─── Utilities ───────────────────────────────────────────────

    pub async fn is_signed_in(&self) -> bool {
        self.identity.current_identity().await.is_some()
    }

    pub async fn current_user_id(&self) -> Option<String> {
        self.identity.current_identity().await.map(|i| i.id)
    }

    /// Boot-time routing hint from the cache. Not an authorization check.
    pub fn boot_route(&self) -> BootRoute {
        let entry = self.cache.entry();
        match entry.user_id {
            Some(user_id) if entry.is_logged_in => BootRoute::Home { user_id },
            _ => BootRoute::Login,
        }
    }

    fn save_session(&self, user_id: &str, name: &str, email: &str) {
        if let Err(e) = self.cache.save(user_id, name, email) {
            tracing::error!(user_id, error = %e, "Failed to save session cache");
        }
    }

    fn mark_profile_complete(&self, complete: bool) {
        if let Err(e) = self.cache.set_profile_complete(complete) {
            tracing::error!(error = %e, "Failed to update profile completeness");
        }
    }
}
