// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! User profile document for storage and display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Profile document stored in Firestore.
///
/// Stored at: `users/{user_id}`. Field names are camelCase so documents
/// written by the mobile clients deserialize unchanged; timestamps are epoch
/// milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Profile {
    /// Identity ID (also used as document ID); never changes
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub bio: String,
    pub profile_picture_url: String,
    pub campus: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub join_date: DateTime<Utc>,
    pub reputation_score: i32,
    pub total_swaps: i32,
    pub total_hours: f64,
    pub badges: BTreeSet<String>,
    pub is_active: bool,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub last_active_at: DateTime<Utc>,
    pub stats: ProfileStats,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            user_id: String::new(),
            email: String::new(),
            name: String::new(),
            bio: String::new(),
            profile_picture_url: String::new(),
            campus: String::new(),
            join_date: DateTime::<Utc>::default(),
            reputation_score: 0,
            total_swaps: 0,
            total_hours: 0.0,
            badges: BTreeSet::new(),
            is_active: true,
            last_active_at: DateTime::<Utc>::default(),
            stats: ProfileStats::default(),
        }
    }
}

impl Profile {
    /// Fresh profile written once when an account is created.
    pub fn new(user_id: &str, email: &str, name: &str, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            join_date: now,
            last_active_at: now,
            ..Default::default()
        }
    }

    pub fn reputation_tier(&self) -> ReputationTier {
        ReputationTier::from_score(self.reputation_score)
    }
}

/// Aggregates nested in the profile document.
///
/// Written here only at creation; swap and rating logic owns later updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProfileStats {
    /// Average rating in `[0, 5]`
    pub avg_rating: f64,
    pub rating_count: u32,
    pub unique_skills_taught: u32,
    pub unique_skills_learned: u32,
    pub completed_swaps: u32,
    pub cancelled_swaps: u32,
    /// Percentage in `[0, 100]`; a new user has cancelled nothing
    pub completion_rate: u32,
}

impl Default for ProfileStats {
    fn default() -> Self {
        Self {
            avg_rating: 0.0,
            rating_count: 0,
            unique_skills_taught: 0,
            unique_skills_learned: 0,
            completed_swaps: 0,
            cancelled_swaps: 0,
            completion_rate: 100,
        }
    }
}

/// Partial profile update with merge semantics.
///
/// Only `Some` fields are written; everything else in the stored document is
/// left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campus: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub last_active_at: Option<DateTime<Utc>>,
}

impl ProfilePatch {
    /// Fields the user edits on the profile screen.
    pub fn edit(name: &str, bio: &str, campus: &str, now: DateTime<Utc>) -> Self {
        Self {
            name: Some(name.to_string()),
            bio: Some(bio.to_string()),
            campus: Some(campus.to_string()),
            last_active_at: Some(now),
            ..Default::default()
        }
    }

    pub fn picture(url: &str) -> Self {
        Self {
            profile_picture_url: Some(url.to_string()),
            ..Default::default()
        }
    }

    pub fn last_active(now: DateTime<Utc>) -> Self {
        Self {
            last_active_at: Some(now),
            ..Default::default()
        }
    }

    /// Document field paths this patch writes (the update mask).
    pub fn field_paths(&self) -> Vec<&'static str> {
        let mut paths = Vec::new();
        if self.name.is_some() {
            paths.push("name");
        }
        if self.bio.is_some() {
            paths.push("bio");
        }
        if self.campus.is_some() {
            paths.push("campus");
        }
        if self.profile_picture_url.is_some() {
            paths.push("profilePictureUrl");
        }
        if self.last_active_at.is_some() {
            paths.push("lastActiveAt");
        }
        paths
    }

    pub fn is_empty(&self) -> bool {
        self.field_paths().is_empty()
    }

    /// Merge this patch into an in-memory profile.
    pub fn apply_to(&self, profile: &mut Profile) {
        if let Some(name) = &self.name {
            profile.name = name.clone();
        }
        if let Some(bio) = &self.bio {
            profile.bio = bio.clone();
        }
        if let Some(campus) = &self.campus {
            profile.campus = campus.clone();
        }
        if let Some(url) = &self.profile_picture_url {
            profile.profile_picture_url = url.clone();
        }
        if let Some(at) = self.last_active_at {
            profile.last_active_at = at;
        }
    }
}

/// Reputation band shown next to a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReputationTier {
    Beginner,
    Emerging,
    Established,
    Expert,
    Master,
}

impl ReputationTier {
    pub fn from_score(score: i32) -> Self {
        match score {
            i32::MIN..=20 => ReputationTier::Beginner,
            21..=40 => ReputationTier::Emerging,
            41..=60 => ReputationTier::Established,
            61..=80 => ReputationTier::Expert,
            _ => ReputationTier::Master,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ReputationTier::Beginner => "Beginner",
            ReputationTier::Emerging => "Emerging",
            ReputationTier::Established => "Established",
            ReputationTier::Expert => "Expert",
            ReputationTier::Master => "Master",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_profile_has_neutral_defaults() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let profile = Profile::new("u1", "asha@test.edu", "Asha", now);

        assert_eq!(profile.join_date, now);
        assert_eq!(profile.last_active_at, now);
        assert!(profile.is_active);
        assert_eq!(profile.reputation_score, 0);
        assert_eq!(profile.total_hours, 0.0);
        assert!(profile.badges.is_empty());
        assert_eq!(profile.stats, ProfileStats::default());
        assert_eq!(profile.stats.completion_rate, 100);
    }

    #[test]
    fn test_document_uses_camel_case_and_millis() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let profile = Profile::new("u1", "asha@test.edu", "Asha", now);
        let json = serde_json::to_value(&profile).unwrap();

        assert_eq!(json["userId"], "u1");
        assert_eq!(json["joinDate"], 1_700_000_000_123i64);
        assert_eq!(json["stats"]["completionRate"], 100);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let profile: Profile =
            serde_json::from_value(serde_json::json!({ "userId": "u2", "name": "Ravi" })).unwrap();
        assert_eq!(profile.user_id, "u2");
        assert_eq!(profile.name, "Ravi");
        assert!(profile.is_active);
        assert_eq!(profile.stats.completion_rate, 100);
    }

    #[test]
    fn test_patch_only_writes_set_fields() {
        let patch = ProfilePatch::picture("https://cdn.example/u1.jpg");
        assert_eq!(patch.field_paths(), vec!["profilePictureUrl"]);

        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "profilePictureUrl": "https://cdn.example/u1.jpg" })
        );
    }

    #[test]
    fn test_patch_reads_back_partial_document() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let patch: ProfilePatch = serde_json::from_value(serde_json::json!({
            "profilePictureUrl": "https://cdn.example/u1.jpg",
            "lastActiveAt": 1_700_000_000_123i64
        }))
        .unwrap();

        assert_eq!(
            patch.profile_picture_url.as_deref(),
            Some("https://cdn.example/u1.jpg")
        );
        assert_eq!(patch.last_active_at, Some(now));
        assert_eq!(patch.name, None);
        assert_eq!(patch.field_paths(), vec!["profilePictureUrl", "lastActiveAt"]);
    }

    #[test]
    fn test_patch_merge_leaves_other_fields() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2026, 4, 1, 12, 0, 0).unwrap();
        let mut profile = Profile::new("u1", "asha@test.edu", "Asha", now);
        profile.profile_picture_url = "pic".to_string();

        ProfilePatch::edit("Asha K", "Guitar", "North", later).apply_to(&mut profile);

        assert_eq!(profile.name, "Asha K");
        assert_eq!(profile.bio, "Guitar");
        assert_eq!(profile.campus, "North");
        assert_eq!(profile.last_active_at, later);
        assert_eq!(profile.profile_picture_url, "pic");
        assert_eq!(profile.join_date, now);
    }

    #[test]
    fn test_reputation_tier_bands() {
        assert_eq!(ReputationTier::from_score(0), ReputationTier::Beginner);
        assert_eq!(ReputationTier::from_score(20), ReputationTier::Beginner);
        assert_eq!(ReputationTier::from_score(21), ReputationTier::Emerging);
        assert_eq!(ReputationTier::from_score(60), ReputationTier::Established);
        assert_eq!(ReputationTier::from_score(80), ReputationTier::Expert);
        assert_eq!(ReputationTier::from_score(100), ReputationTier::Master);
    }
}
