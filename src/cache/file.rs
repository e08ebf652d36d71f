// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! File-backed session cache.
//!
//! The record is kept as one JSON document. Each write goes to a sibling
//! temp file which is synced and then renamed over the original, so a crash
//! leaves either the old record or the new one on disk.

use super::SessionCache;
use crate::error::CacheError;
use crate::models::SessionCacheEntry;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

/// Session cache persisted to a JSON file.
#[derive(Debug)]
pub struct FileSessionCache {
    path: PathBuf,
    /// In-memory copy served to readers
    entry: RwLock<SessionCacheEntry>,
    /// Serializes writers so temp files never interleave
    write_lock: Mutex<()>,
}

impl FileSessionCache {
    /// Open (or lazily create) the cache at `path`.
    ///
    /// An unreadable record is discarded with a warning: the cache is only a
    /// hint and the user can always sign in again.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CacheError> {
        let path = path.as_ref().to_path_buf();

        let entry = match fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Discarding corrupt session cache");
                    SessionCacheEntry::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => SessionCacheEntry::default(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            entry: RwLock::new(entry),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist the next record, then publish it to readers.
    fn replace<F>(&self, f: F) -> Result<(), CacheError>
    where
        F: FnOnce(&SessionCacheEntry) -> SessionCacheEntry,
    {
        let _writer = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let next = f(&self.entry());

        self.persist(&next)?;

        *self.entry.write().unwrap_or_else(|e| e.into_inner()) = next;
        Ok(())
    }

    fn persist(&self, entry: &SessionCacheEntry) -> Result<(), CacheError> {
        let json =
            serde_json::to_vec_pretty(entry).map_err(|e| CacheError::Corrupt(e.to_string()))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut file = fs::File::create(&tmp)?;
        file.write_all(&json)?;
        file.sync_all()?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SessionCache for FileSessionCache {
    fn entry(&self) -> SessionCacheEntry {
        self.entry
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn save(&self, user_id: &str, name: &str, email: &str) -> Result<(), CacheError> {
        self.replace(|prev| SessionCacheEntry::logged_in(prev, user_id, name, email))
    }

    fn clear(&self) -> Result<(), CacheError> {
        self.replace(|_| SessionCacheEntry::default())
    }

    fn set_profile_complete(&self, complete: bool) -> Result<(), CacheError> {
        self.replace(|prev| SessionCacheEntry {
            is_profile_complete: complete,
            ..prev.clone()
        })
    }

    fn update_name(&self, name: &str) -> Result<(), CacheError> {
        self.replace(|prev| SessionCacheEntry {
            name: Some(name.to_string()),
            ..prev.clone()
        })
    }
}
