// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use chrono::{DateTime, TimeZone, Utc};
use skillswap_session::cache::MemorySessionCache;
use skillswap_session::db::FirestoreDb;
use skillswap_session::services::mock::{MockAssetStore, MockIdentityProvider, MockProfileStore};
use skillswap_session::services::{ProfileReconciler, SessionReconciler};
use skillswap_session::time_utils::FixedClock;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Fixed "now" used by every harness.
#[allow(dead_code)]
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

/// Generate a unique user ID for test isolation.
#[allow(dead_code)]
pub fn unique_user_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("test-user-{}", nanos)
}

/// Reconcilers wired to offline mock collaborators.
#[allow(dead_code)]
pub struct Harness {
    pub identity: Arc<MockIdentityProvider>,
    pub profiles: Arc<MockProfileStore>,
    pub assets: Arc<MockAssetStore>,
    pub cache: Arc<MemorySessionCache>,
    pub session: SessionReconciler,
    pub profile: ProfileReconciler,
}

/// Create a harness with empty mocks.
#[allow(dead_code)]
pub fn harness() -> Harness {
    harness_with_cache(MemorySessionCache::new())
}

/// Create a harness starting from an existing session record.
#[allow(dead_code)]
pub fn harness_with_cache(cache: MemorySessionCache) -> Harness {
    let identity = Arc::new(MockIdentityProvider::new());
    let profiles = Arc::new(MockProfileStore::new());
    let assets = Arc::new(MockAssetStore::new());
    let cache = Arc::new(cache);
    let clock = Arc::new(FixedClock(test_now()));

    let session = SessionReconciler::new(
        identity.clone(),
        profiles.clone(),
        cache.clone(),
        clock.clone(),
    );
    let profile = ProfileReconciler::new(profiles.clone(), assets.clone(), cache.clone(), clock);

    Harness {
        identity,
        profiles,
        assets,
        cache,
        session,
        profile,
    }
}
