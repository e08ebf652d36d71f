// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SkillSwap session demo
//!
//! Wires the Firebase collaborators and the file-backed session cache from
//! the environment, reports where the app would boot to, and optionally
//! signs in with demo credentials.

use anyhow::Context;
use skillswap_session::{
    cache::FileSessionCache,
    config::Config,
    db::FirestoreDb,
    logging::init_logging,
    services::{AuthOutcome, BootRoute, FirebaseAuthClient, FirebaseStorageAssets, ProfileOutcome},
    time_utils::{format_utc_rfc3339, SystemClock},
    AppState,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(project = %config.gcp_project_id, "Starting SkillSwap session demo");

    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .context("Failed to connect to Firestore")?;

    let auth = Arc::new(
        FirebaseAuthClient::new(&config.identity_base_url, &config.firebase_api_key)
            .with_token_base_url(&config.token_base_url),
    );
    let assets = FirebaseStorageAssets::new(
        &config.storage_base_url,
        &config.storage_bucket,
        auth.clone(),
    );

    let cache = FileSessionCache::open(&config.session_cache_path).with_context(|| {
        format!(
            "Failed to open session cache at {}",
            config.session_cache_path.display()
        )
    })?;
    tracing::info!(path = %cache.path().display(), "Session cache opened");

    let state = AppState::new(
        auth,
        Arc::new(db),
        Arc::new(assets),
        Arc::new(cache),
        Arc::new(SystemClock),
    );

    match state.session.boot_route() {
        BootRoute::Home { user_id } => println!("Boot route: home (cached user {})", user_id),
        BootRoute::Login => println!("Boot route: login"),
    }

    let (Ok(email), Ok(password)) = (
        std::env::var("SKILLSWAP_DEMO_EMAIL"),
        std::env::var("SKILLSWAP_DEMO_PASSWORD"),
    ) else {
        return Ok(());
    };

    let outcome = match state.session.sign_in(&email, &password).await {
        Ok(outcome) => outcome,
        Err(errors) => {
            for error in errors.errors() {
                println!("{:?}: {}", error.field(), error);
            }
            return Ok(());
        }
    };
    println!("Sign-in: {}", serde_json::to_string(&outcome)?);

    if let AuthOutcome::Authenticated(user_id) = outcome {
        if let ProfileOutcome::Loaded = state.profile.load(&user_id).await {
            if let Some(profile) = state.profile.current_profile() {
                println!(
                    "Profile: {} ({}), last active {}",
                    profile.name,
                    profile.reputation_tier().display_name(),
                    format_utc_rfc3339(profile.last_active_at)
                );
            }
        }

        if let Err(e) = state.profile.record_activity().await {
            tracing::warn!(error = %e, "Failed to record activity");
        }
    }

    Ok(())
}
