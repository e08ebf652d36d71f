// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local session cache.
//!
//! A single record survives process restarts and answers "is someone logged
//! in" without touching the network. Writers replace the whole record at
//! once, so readers never observe a half-written session.

pub mod file;
pub mod memory;

pub use file::FileSessionCache;
pub use memory::MemorySessionCache;

use crate::error::CacheError;
use crate::models::SessionCacheEntry;

/// Durable key-value storage for the session record.
///
/// Every call is synchronous; a write that returns `Ok` is durable.
pub trait SessionCache: Send + Sync {
    /// Snapshot of the whole record.
    fn entry(&self) -> SessionCacheEntry;

    /// Store the user and mark the session logged in.
    fn save(&self, user_id: &str, name: &str, email: &str) -> Result<(), CacheError>;

    /// Drop everything, including the logged-in flag.
    fn clear(&self) -> Result<(), CacheError>;

    fn set_profile_complete(&self, complete: bool) -> Result<(), CacheError>;

    fn update_name(&self, name: &str) -> Result<(), CacheError>;

    fn is_logged_in(&self) -> bool {
        self.entry().is_logged_in
    }

    fn user_id(&self) -> Option<String> {
        self.entry().user_id
    }

    fn name(&self) -> Option<String> {
        self.entry().name
    }

    fn email(&self) -> Option<String> {
        self.entry().email
    }

    fn is_profile_complete(&self) -> bool {
        self.entry().is_profile_complete
    }
}
