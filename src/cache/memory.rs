// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory session cache.

use super::SessionCache;
use crate::error::CacheError;
use crate::models::SessionCacheEntry;
use std::sync::RwLock;

/// Session cache that lives only as long as the process.
///
/// The reference implementation of [`SessionCache`]: every write swaps the
/// whole record under one lock.
#[derive(Debug, Default)]
pub struct MemorySessionCache {
    entry: RwLock<SessionCacheEntry>,
}

impl MemorySessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing record (e.g. a previous login).
    pub fn with_entry(entry: SessionCacheEntry) -> Self {
        Self {
            entry: RwLock::new(entry),
        }
    }

    fn replace<F>(&self, f: F)
    where
        F: FnOnce(&SessionCacheEntry) -> SessionCacheEntry,
    {
        let mut guard = self.entry.write().unwrap_or_else(|e| e.into_inner());
        let next = f(&guard);
        *guard = next;
    }
}

impl SessionCache for MemorySessionCache {
    fn entry(&self) -> SessionCacheEntry {
        self.entry
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn save(&self, user_id: &str, name: &str, email: &str) -> Result<(), CacheError> {
        self.replace(|prev| SessionCacheEntry::logged_in(prev, user_id, name, email));
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        self.replace(|_| SessionCacheEntry::default());
        Ok(())
    }

    fn set_profile_complete(&self, complete: bool) -> Result<(), CacheError> {
        self.replace(|prev| SessionCacheEntry {
            is_profile_complete: complete,
            ..prev.clone()
        });
        Ok(())
    }

    fn update_name(&self, name: &str) -> Result<(), CacheError> {
        self.replace(|prev| SessionCacheEntry {
            name: Some(name.to_string()),
            ..prev.clone()
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_clear() {
        let cache = MemorySessionCache::new();
        assert!(!cache.is_logged_in());
        assert_eq!(cache.user_id(), None);

        cache.save("u1", "Asha", "asha@test.edu").unwrap();
        assert!(cache.is_logged_in());
        assert_eq!(cache.user_id().as_deref(), Some("u1"));
        assert_eq!(cache.name().as_deref(), Some("Asha"));
        assert_eq!(cache.email().as_deref(), Some("asha@test.edu"));

        cache.clear().unwrap();
        assert_eq!(cache.entry(), SessionCacheEntry::default());
    }

    #[test]
    fn test_save_keeps_profile_completeness() {
        let cache = MemorySessionCache::new();
        cache.save("u1", "", "asha@test.edu").unwrap();
        cache.set_profile_complete(true).unwrap();
        cache.save("u1", "", "asha@test.edu").unwrap();
        assert!(cache.is_profile_complete());

        cache.save("u2", "Ravi", "ravi@test.edu").unwrap();
        assert!(!cache.is_profile_complete());
        cache.save("u1", "", "asha@test.edu").unwrap();
        assert!(!cache.is_profile_complete());

        cache.update_name("Asha").unwrap();
        assert_eq!(cache.name().as_deref(), Some("Asha"));
        assert_eq!(cache.user_id().as_deref(), Some("u1"));
        assert!(cache.is_logged_in());
    }
}
