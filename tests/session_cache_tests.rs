// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! File-backed session cache tests.

use skillswap_session::cache::{FileSessionCache, SessionCache};
use skillswap_session::models::SessionCacheEntry;
use std::sync::Arc;

#[test]
fn test_missing_file_starts_logged_out() {
    let dir = tempfile::tempdir().unwrap();
    let cache = FileSessionCache::open(dir.path().join("session.json")).unwrap();

    assert_eq!(cache.entry(), SessionCacheEntry::default());
    assert!(!cache.is_logged_in());
    assert!(!cache.path().exists(), "opening must not create the file");
}

#[test]
fn test_record_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    {
        let cache = FileSessionCache::open(&path).unwrap();
        cache.save("u1", "Asha", "asha@test.edu").unwrap();
        cache.set_profile_complete(true).unwrap();
    }

    let reopened = FileSessionCache::open(&path).unwrap();
    assert_eq!(
        reopened.entry(),
        SessionCacheEntry {
            user_id: Some("u1".to_string()),
            name: Some("Asha".to_string()),
            email: Some("asha@test.edu".to_string()),
            is_logged_in: true,
            is_profile_complete: true,
        }
    );
}

#[test]
fn test_clear_is_durable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let cache = FileSessionCache::open(&path).unwrap();
    cache.save("u1", "Asha", "asha@test.edu").unwrap();
    cache.clear().unwrap();

    let reopened = FileSessionCache::open(&path).unwrap();
    assert!(!reopened.is_logged_in());
    assert_eq!(reopened.user_id(), None);
}

#[test]
fn test_corrupt_file_is_discarded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "{ not json").unwrap();

    let cache = FileSessionCache::open(&path).unwrap();
    assert_eq!(cache.entry(), SessionCacheEntry::default());

    // The next write replaces the corrupt record
    cache.save("u1", "", "asha@test.edu").unwrap();
    let reopened = FileSessionCache::open(&path).unwrap();
    assert_eq!(reopened.user_id().as_deref(), Some("u1"));
}

#[test]
fn test_file_uses_camel_case_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("session.json");

    let cache = FileSessionCache::open(&path).unwrap();
    cache.save("u1", "Asha", "asha@test.edu").unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["userId"], "u1");
    assert_eq!(json["isLoggedIn"], true);
    assert_eq!(json["isProfileComplete"], false);
}

#[test]
fn test_concurrent_writers_never_tear_the_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let cache = Arc::new(FileSessionCache::open(&path).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let cache = cache.clone();
            std::thread::spawn(move || {
                for _ in 0..10 {
                    let id = format!("u{}", i);
                    cache
                        .save(&id, &format!("User {}", i), &format!("{}@test.edu", id))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Whoever wrote last, all three fields belong to the same writer
    let entry = FileSessionCache::open(&path).unwrap().entry();
    let id = entry.user_id.unwrap();
    let n = id.trim_start_matches('u');
    assert_eq!(entry.name, Some(format!("User {}", n)));
    assert_eq!(entry.email, Some(format!("{}@test.edu", id)));
    assert_eq!(cache.entry().user_id, Some(id));
}
