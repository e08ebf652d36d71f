// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Locally cached session record.

use serde::{Deserialize, Serialize};

/// Denormalized projection of identity + profile kept on the device.
///
/// This is a boot-time hint and may be stale at any point. `is_logged_in`
/// only records that a sign-in or sign-up call completed; it says nothing
/// about verification or whether a profile document exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCacheEntry {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_logged_in: bool,
    #[serde(default)]
    pub is_profile_complete: bool,
}

impl SessionCacheEntry {
    /// Record written on a successful sign-in or sign-up.
    ///
    /// Profile completeness is tracked separately from login: it is carried
    /// over from `previous` for the same user and starts out `false` for a
    /// different one.
    pub fn logged_in(previous: &Self, user_id: &str, name: &str, email: &str) -> Self {
        let same_user = previous.user_id.as_deref() == Some(user_id);
        Self {
            user_id: Some(user_id.to_string()),
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            is_logged_in: true,
            is_profile_complete: same_user && previous.is_profile_complete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete(user_id: &str) -> SessionCacheEntry {
        SessionCacheEntry {
            user_id: Some(user_id.to_string()),
            name: Some("Ravi".to_string()),
            email: Some("ravi@test.edu".to_string()),
            is_logged_in: true,
            is_profile_complete: true,
        }
    }

    #[test]
    fn test_same_user_keeps_profile_completeness() {
        let entry = SessionCacheEntry::logged_in(&complete("u9"), "u9", "", "ravi@test.edu");
        assert!(entry.is_profile_complete);
    }

    #[test]
    fn test_new_user_does_not_inherit_profile_completeness() {
        let entry = SessionCacheEntry::logged_in(&complete("u9"), "u1", "", "asha@test.edu");
        assert_eq!(entry.user_id.as_deref(), Some("u1"));
        assert!(entry.is_logged_in);
        assert!(!entry.is_profile_complete);

        let fresh = SessionCacheEntry::logged_in(&SessionCacheEntry::default(), "u1", "", "");
        assert!(!fresh.is_profile_complete);
    }
}
