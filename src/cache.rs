use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use sha2::{Digest, Sha256};

// Rough per-entry bookkeeping cost beyond the strings themselves
const ENTRY_OVERHEAD_BYTES: usize = 64;

// Cache entry with generation timestamp; callers get clones, never references
#[derive(Clone)]
pub struct CacheEntry {
    pub storyline: String,
    pub created_at: DateTime<Utc>,
}

pub struct CacheStats {
    pub total_entries: usize,
    pub ttl_seconds: u64,
    pub approx_size_bytes: usize,
}

/// In-memory TTL cache for generated storylines. Timestamps come from
/// the caller, so expiry is a pure function of `now` and `created_at`.
pub struct CacheStore {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl CacheStore {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            entries: DashMap::new(),
            ttl: Duration::seconds(ttl_seconds as i64),
        }
    }

    // Deterministic fingerprint of the normalized request triple
    pub fn key_for(genre: &str, runtime: i64, character_count: i64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(genre.as_bytes());
        hasher.update(b"\n");
        hasher.update(runtime.to_string().as_bytes());
        hasher.update(b"\n");
        hasher.update(character_count.to_string().as_bytes());
        format!("{:x}", hasher.finalize())
    }

    // Returns the entry only while it is fresh; an expired entry is
    // reported absent, never served stale
    pub fn lookup(&self, key: &str, now: DateTime<Utc>) -> Option<CacheEntry> {
        let entry = self.entries.get(key)?;
        if now - entry.created_at < self.ttl {
            Some(entry.clone())
        } else {
            None
        }
    }

    // Overwrites any previous entry for the key
    pub fn insert(&self, key: String, storyline: String, now: DateTime<Utc>) {
        self.entries.insert(
            key,
            CacheEntry {
                storyline,
                created_at: now,
            },
        );
    }

    // Drop every entry whose age reached the TTL, returning how many went.
    // Counted inside the retain pass; a length diff would race concurrent inserts.
    pub fn evict_expired(&self, now: DateTime<Utc>) -> usize {
        let removed = AtomicUsize::new(0);
        self.entries.retain(|_, entry| {
            let fresh = now - entry.created_at < self.ttl;
            if !fresh {
                removed.fetch_add(1, Ordering::Relaxed);
            }
            fresh
        });
        removed.into_inner()
    }

    pub fn clear(&self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        let mut approx_size_bytes = 0;
        for entry in self.entries.iter() {
            approx_size_bytes +=
                entry.key().len() + entry.value().storyline.len() + ENTRY_OVERHEAD_BYTES;
        }
        CacheStats {
            total_entries: self.entries.len(),
            ttl_seconds: self.ttl.num_seconds() as u64,
            approx_size_bytes,
        }
    }
}
