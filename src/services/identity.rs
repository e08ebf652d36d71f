// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity provider contract.

use crate::error::ProviderError;
use crate::models::Identity;
use async_trait::async_trait;

/// Authentication service keyed by email and password.
///
/// Implementations track the signed-in identity themselves; the
/// verification and reload calls act on that identity and fail with
/// [`ProviderError::NoCurrentUser`] when nobody is signed in.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account and sign it in.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, ProviderError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, ProviderError>;

    /// Forget the signed-in identity. Callers treat failure as non-fatal.
    async fn sign_out(&self) -> Result<(), ProviderError>;

    async fn send_password_reset(&self, email: &str) -> Result<(), ProviderError>;

    async fn send_verification_email(&self) -> Result<(), ProviderError>;

    /// Fetch the signed-in identity from the provider, refreshing
    /// `email_verified`.
    async fn reload(&self) -> Result<Identity, ProviderError>;

    /// Last known signed-in identity, without a round trip.
    async fn current_identity(&self) -> Option<Identity>;
}
