// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! SkillSwap session: identity and profile reconciliation
//!
//! This crate keeps three sources of truth in step for a signed-in user: the
//! identity provider (Firebase Authentication), the profile document store
//! (Firestore) and a small session record cached on the device.

pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod time_utils;
pub mod validation;

use cache::SessionCache;
use db::ProfileStore;
use services::{AssetStore, IdentityProvider, ProfileReconciler, SessionReconciler};
use std::sync::Arc;
use time_utils::Clock;

/// Both reconcilers wired to one shared set of collaborators.
pub struct AppState {
    pub session: SessionReconciler,
    pub profile: ProfileReconciler,
}

impl AppState {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        profiles: Arc<dyn ProfileStore>,
        assets: Arc<dyn AssetStore>,
        cache: Arc<dyn SessionCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            session: SessionReconciler::new(
                identity,
                profiles.clone(),
                cache.clone(),
                clock.clone(),
            ),
            profile: ProfileReconciler::new(profiles, assets, cache, clock),
        }
    }
}
