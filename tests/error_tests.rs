// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use skillswap_session::error::{ProviderError, StoreError};
use skillswap_session::services::firebase_auth::map_error_code;

#[test]
fn test_user_message_fixed_lookup() {
    assert_eq!(
        ProviderError::NoSuchUser.user_message(),
        "No account found with this email."
    );
    assert_eq!(
        ProviderError::BadCredentials.user_message(),
        "Invalid email or password."
    );
    assert_eq!(
        ProviderError::EmailTaken.user_message(),
        "This email is already registered. Try logging in instead."
    );
    assert_eq!(
        ProviderError::RateLimited.user_message(),
        "Too many attempts. Please try again later."
    );
    assert_eq!(
        ProviderError::SessionExpired.user_message(),
        "Your session has expired. Please log in again."
    );
    assert_eq!(
        ProviderError::Network("connection reset".to_string()).user_message(),
        "Network error. Please check your internet connection."
    );
}

#[test]
fn test_unknown_falls_back_to_raw_message() {
    let err = ProviderError::Unknown("USER_DISABLED".to_string());
    assert_eq!(err.user_message(), "USER_DISABLED");

    let err = ProviderError::Unknown("  ".to_string());
    assert_eq!(err.user_message(), ProviderError::GENERIC_MESSAGE);
}

#[test]
fn test_mapped_codes_produce_friendly_messages() {
    assert_eq!(
        map_error_code("INVALID_EMAIL").user_message(),
        "Invalid email format. Please check your email."
    );
    assert!(map_error_code("WEAK_PASSWORD : too short")
        .user_message()
        .starts_with("Password is too weak"));
    assert_eq!(map_error_code("TOKEN_EXPIRED"), ProviderError::SessionExpired);
}

#[test]
fn test_store_error_not_found() {
    assert!(StoreError::NotFound("users/u1".to_string()).is_not_found());
    assert!(!StoreError::Database("timeout".to_string()).is_not_found());
    assert!(!StoreError::Asset("quota".to_string()).is_not_found());
}
