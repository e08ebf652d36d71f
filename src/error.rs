// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error types for the remote collaborators and the local session cache.
//!
//! Validation failures live in [`crate::validation`]; they never reach a
//! remote call.

/// Failure reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("No account exists for this email")]
    NoSuchUser,

    #[error("Credentials were rejected")]
    BadCredentials,

    #[error("Password rejected by provider")]
    WeakPassword,

    #[error("Email is already registered")]
    EmailTaken,

    #[error("Email rejected by provider")]
    InvalidEmailFormat,

    #[error("Too many requests")]
    RateLimited,

    #[error("Network error: {0}")]
    Network(String),

    #[error("No user is signed in")]
    NoCurrentUser,

    #[error("Session expired")]
    SessionExpired,

    #[error("{0}")]
    Unknown(String),
}

impl ProviderError {
    /// Fallback shown when the provider gives no message at all.
    pub const GENERIC_MESSAGE: &'static str = "Something went wrong. Please try again.";

    /// Human-readable message for the single `Error` outcome of an operation.
    ///
    /// `Unknown` passes the provider's raw message through.
    pub fn user_message(&self) -> String {
        match self {
            ProviderError::NoSuchUser => "No account found with this email.".to_string(),
            ProviderError::BadCredentials => "Invalid email or password.".to_string(),
            ProviderError::WeakPassword => {
                "Password is too weak. Use at least 8 characters with uppercase and numbers."
                    .to_string()
            }
            ProviderError::EmailTaken => {
                "This email is already registered. Try logging in instead.".to_string()
            }
            ProviderError::InvalidEmailFormat => {
                "Invalid email format. Please check your email.".to_string()
            }
            ProviderError::RateLimited => "Too many attempts. Please try again later.".to_string(),
            ProviderError::Network(_) => {
                "Network error. Please check your internet connection.".to_string()
            }
            ProviderError::NoCurrentUser => "No user is signed in.".to_string(),
            ProviderError::SessionExpired => {
                "Your session has expired. Please log in again.".to_string()
            }
            ProviderError::Unknown(raw) if raw.trim().is_empty() => {
                Self::GENERIC_MESSAGE.to_string()
            }
            ProviderError::Unknown(raw) => raw.clone(),
        }
    }
}

/// Failure reported by the profile document store or the asset store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Asset storage error: {0}")]
    Asset(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Failure persisting or reading the local session record.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Session cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session cache is corrupt: {0}")]
    Corrupt(String),
}
