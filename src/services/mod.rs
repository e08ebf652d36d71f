// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - reconcilers and their remote collaborators.

mod busy;
pub mod firebase_auth;
pub mod identity;
#[cfg(debug_assertions)]
pub mod mock;
pub mod profile;
pub mod session;
pub mod storage;

pub use firebase_auth::FirebaseAuthClient;
pub use identity::IdentityProvider;
pub use profile::{ProfileOutcome, ProfileReconciler};
pub use session::{AuthOutcome, BootRoute, SessionReconciler};
pub use storage::{AccessTokenProvider, AssetStore, FirebaseStorageAssets};
