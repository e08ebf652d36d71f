// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honored for local development. Every remote endpoint can
//! be overridden so the Firebase emulators (or a test server) can stand in
//! for the production services.

use std::env;
use std::path::PathBuf;

const DEFAULT_IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const DEFAULT_TOKEN_BASE_URL: &str = "https://securetoken.googleapis.com/v1";
const DEFAULT_STORAGE_BASE_URL: &str = "https://firebasestorage.googleapis.com/v0";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Firebase Web API key used by the Identity Toolkit REST API
    pub firebase_api_key: String,
    /// GCP project ID (also the Firestore project)
    pub gcp_project_id: String,
    /// Firebase Storage bucket for profile pictures
    pub storage_bucket: String,
    /// Where the local session record is persisted
    pub session_cache_path: PathBuf,
    /// Identity Toolkit base URL
    pub identity_base_url: String,
    /// Secure Token API base URL, for ID token refresh
    pub token_base_url: String,
    /// Firebase Storage base URL
    pub storage_base_url: String,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            firebase_api_key: "test_api_key".to_string(),
            gcp_project_id: "test-project".to_string(),
            storage_bucket: "test-project.appspot.com".to_string(),
            session_cache_path: env::temp_dir().join("skillswap_session_test.json"),
            identity_base_url: DEFAULT_IDENTITY_BASE_URL.to_string(),
            token_base_url: DEFAULT_TOKEN_BASE_URL.to_string(),
            storage_base_url: DEFAULT_STORAGE_BASE_URL.to_string(),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let gcp_project_id =
            env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string());

        Ok(Self {
            firebase_api_key: env::var("FIREBASE_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("FIREBASE_API_KEY"))?,
            storage_bucket: env::var("FIREBASE_STORAGE_BUCKET")
                .unwrap_or_else(|_| format!("{}.appspot.com", gcp_project_id)),
            session_cache_path: env::var("SESSION_CACHE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("skillswap_session.json")),
            identity_base_url: env::var("IDENTITY_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_IDENTITY_BASE_URL.to_string()),
            token_base_url: env::var("SECURE_TOKEN_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_TOKEN_BASE_URL.to_string()),
            storage_base_url: env::var("STORAGE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_STORAGE_BASE_URL.to_string()),
            gcp_project_id,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("FIREBASE_API_KEY", " test_key ");
        env::set_var("GCP_PROJECT_ID", "swap-test");
        env::remove_var("FIREBASE_STORAGE_BUCKET");
        env::remove_var("SECURE_TOKEN_BASE_URL");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.firebase_api_key, "test_key");
        assert_eq!(config.gcp_project_id, "swap-test");
        assert_eq!(config.storage_bucket, "swap-test.appspot.com");
        assert_eq!(config.token_base_url, DEFAULT_TOKEN_BASE_URL);
    }
}
