// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firebase Authentication client (Identity Toolkit REST API).
//!
//! Handles:
//! - Email/password sign-up and sign-in
//! - Verification and password-reset emails
//! - Reloading the signed-in user to refresh the verification flag
//! - Refreshing the one-hour ID token before it expires
//! - Mapping provider error codes onto [`ProviderError`]

use crate::error::{ProviderError, StoreError};
use crate::models::Identity;
use crate::services::identity::IdentityProvider;
use crate::services::storage::AccessTokenProvider;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Secure Token API used to exchange refresh tokens.
pub const DEFAULT_TOKEN_BASE_URL: &str = "https://securetoken.googleapis.com/v1";

/// Margin before ID token expiration when we proactively refresh (5 minutes).
const TOKEN_REFRESH_MARGIN_SECS: i64 = 5 * 60;

/// Lifetime assumed when the provider omits `expiresIn`.
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 60 * 60;

/// Signed-in user as held by the client.
#[derive(Clone)]
struct AuthSession {
    identity: Identity,
    id_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
}

impl AuthSession {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(TOKEN_REFRESH_MARGIN_SECS) < self.expires_at
    }
}

/// Firebase Authentication client.
///
/// Clones share the signed-in session.
#[derive(Clone)]
pub struct FirebaseAuthClient {
    http: reqwest::Client,
    base_url: String,
    token_base_url: String,
    api_key: String,
    session: Arc<RwLock<Option<AuthSession>>>,
    /// Serializes token refreshes so one refresh token is spent at a time.
    refresh_lock: Arc<Mutex<()>>,
}

impl FirebaseAuthClient {
    /// Create a client for the given Web API key.
    ///
    /// `base_url` is normally `https://identitytoolkit.googleapis.com/v1`;
    /// point it at the Auth emulator or a test server otherwise.
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token_base_url: DEFAULT_TOKEN_BASE_URL.to_string(),
            api_key: api_key.to_string(),
            session: Arc::new(RwLock::new(None)),
            refresh_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Point token refreshes somewhere other than the Secure Token API.
    pub fn with_token_base_url(mut self, token_base_url: &str) -> Self {
        self.token_base_url = token_base_url.trim_end_matches('/').to_string();
        self
    }

    // ─── Token Management ────────────────────────────────────────

    /// ID token of the signed-in user, refreshed first when it is about to
    /// expire.
    async fn id_token(&self) -> Result<String, ProviderError> {
        let session = self
            .session
            .read()
            .await
            .clone()
            .ok_or(ProviderError::NoCurrentUser)?;

        if session.is_fresh(Utc::now()) {
            return Ok(session.id_token);
        }
        self.refresh(&session.id_token).await
    }

    /// Exchange the refresh token for a new ID token.
    ///
    /// `stale` is the ID token the caller gave up on. If another task has
    /// already replaced it with a fresh one, that token is returned without
    /// another exchange.
    async fn refresh(&self, stale: &str) -> Result<String, ProviderError> {
        let _guard = self.refresh_lock.lock().await;

        let session = self
            .session
            .read()
            .await
            .clone()
            .ok_or(ProviderError::NoCurrentUser)?;
        if session.id_token != stale && session.is_fresh(Utc::now()) {
            return Ok(session.id_token);
        }

        tracing::info!(user_id = %session.identity.id, "ID token expiring, refreshing");

        let url = format!("{}/token", self.token_base_url);
        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", session.refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        let refreshed: RefreshResponse = check_response_json("token", response).await?;

        let expires_at = expiry_from(refreshed.expires_in.as_deref(), Utc::now());
        let mut current = self.session.write().await;
        match current.as_mut() {
            Some(current) if current.identity.id == session.identity.id => {
                current.id_token = refreshed.id_token.clone();
                current.refresh_token = refreshed.refresh_token;
                current.expires_at = expires_at;
                Ok(refreshed.id_token)
            }
            // Signed out (or switched user) while the refresh was in flight
            _ => Err(ProviderError::NoCurrentUser),
        }
    }

    async fn start_session(&self, identity: Identity, tokens: TokenResponse) {
        let expires_at = expiry_from(tokens.expires_in.as_deref(), Utc::now());
        *self.session.write().await = Some(AuthSession {
            identity,
            id_token: tokens.id_token,
            refresh_token: tokens.refresh_token,
            expires_at,
        });
    }

    async fn update_identity(&self, identity: Identity) {
        if let Some(session) = self.session.write().await.as_mut() {
            session.identity = identity;
        }
    }

    /// Look up the account behind an ID token.
    async fn lookup(&self, id_token: &str) -> Result<Identity, ProviderError> {
        let body = serde_json::json!({ "idToken": id_token });
        let response: LookupResponse = self.post("lookup", &body).await?;

        response
            .users
            .into_iter()
            .next()
            .map(|user| Identity {
                id: user.local_id,
                email: user.email.unwrap_or_default(),
                email_verified: user.email_verified,
            })
            .ok_or_else(|| ProviderError::Unknown("Account lookup returned no user".to_string()))
    }

    /// POST to an `accounts:*` endpoint and parse the JSON response.
    async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ProviderError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/accounts:{}", self.base_url, endpoint);

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        check_response_json(endpoint, response).await
    }
}

/// Check response status and parse the JSON body.
async fn check_response_json<T: DeserializeOwned>(
    endpoint: &str,
    response: reqwest::Response,
) -> Result<T, ProviderError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.as_u16() == 429 {
            tracing::warn!(endpoint, "Identity provider rate limit hit (429)");
            return Err(ProviderError::RateLimited);
        }

        return Err(parse_error_body(status, &body));
    }

    response
        .json()
        .await
        .map_err(|e| ProviderError::Unknown(format!("Unexpected provider response: {}", e)))
}

/// When a token with the given `expiresIn` (seconds, as a string) expires.
fn expiry_from(expires_in: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    let secs = expires_in
        .and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);
    now + Duration::seconds(secs)
}

#[async_trait]
impl IdentityProvider for FirebaseAuthClient {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, ProviderError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });
        let response: TokenResponse = self.post("signUp", &body).await?;

        let identity = Identity {
            id: response.local_id.clone(),
            email: response.email.clone().unwrap_or_else(|| email.to_string()),
            email_verified: false,
        };
        self.start_session(identity.clone(), response).await;

        tracing::info!(user_id = %identity.id, "Account created");
        Ok(identity)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, ProviderError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });
        let response: TokenResponse = self.post("signInWithPassword", &body).await?;

        // The sign-in response has no verification flag
        let identity = self.lookup(&response.id_token).await?;
        self.start_session(identity.clone(), response).await;

        tracing::info!(user_id = %identity.id, "Signed in");
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        *self.session.write().await = None;
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), ProviderError> {
        let body = serde_json::json!({
            "requestType": "PASSWORD_RESET",
            "email": email,
        });
        let _: serde_json::Value = self.post("sendOobCode", &body).await?;
        Ok(())
    }

    async fn send_verification_email(&self) -> Result<(), ProviderError> {
        let id_token = self.id_token().await?;
        let body = serde_json::json!({
            "requestType": "VERIFY_EMAIL",
            "idToken": id_token,
        });
        let _: serde_json::Value = self.post("sendOobCode", &body).await?;
        Ok(())
    }

    async fn reload(&self) -> Result<Identity, ProviderError> {
        let id_token = self.id_token().await?;

        let identity = match self.lookup(&id_token).await {
            // Revoked or expired ahead of its stated lifetime: refresh once
            Err(ProviderError::SessionExpired) => {
                let id_token = self.refresh(&id_token).await?;
                self.lookup(&id_token).await?
            }
            other => other?,
        };

        self.update_identity(identity.clone()).await;
        Ok(identity)
    }

    async fn current_identity(&self) -> Option<Identity> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|s| s.identity.clone())
    }
}

#[async_trait]
impl AccessTokenProvider for FirebaseAuthClient {
    async fn access_token(&self) -> Result<String, StoreError> {
        self.id_token()
            .await
            .map_err(|e| StoreError::Asset(e.to_string()))
    }
}

/// Map an Identity Toolkit error code onto a [`ProviderError`].
///
/// Codes may carry a detail suffix, e.g. `WEAK_PASSWORD : Password should be
/// at least 6 characters`.
pub fn map_error_code(message: &str) -> ProviderError {
    let code = message.split(" : ").next().unwrap_or(message).trim();

    match code {
        "EMAIL_EXISTS" => ProviderError::EmailTaken,
        "EMAIL_NOT_FOUND" | "USER_NOT_FOUND" => ProviderError::NoSuchUser,
        "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => ProviderError::BadCredentials,
        "WEAK_PASSWORD" => ProviderError::WeakPassword,
        "INVALID_EMAIL" => ProviderError::InvalidEmailFormat,
        "TOO_MANY_ATTEMPTS_TRY_LATER" => ProviderError::RateLimited,
        "TOKEN_EXPIRED" | "INVALID_ID_TOKEN" | "INVALID_REFRESH_TOKEN" => {
            ProviderError::SessionExpired
        }
        _ => ProviderError::Unknown(message.to_string()),
    }
}

fn parse_error_body(status: reqwest::StatusCode, body: &str) -> ProviderError {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(parsed) => map_error_code(&parsed.error.message),
        Err(_) => ProviderError::Unknown(format!("HTTP {}: {}", status, body)),
    }
}

/// Response of `accounts:signUp` and `accounts:signInWithPassword`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    id_token: String,
    #[serde(default)]
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<String>,
}

/// Response of the Secure Token API (snake_case, unlike Identity Toolkit).
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}
