//! Short-lived cache of rendered index pages.
//!
//! Only the unfiltered post list is cached; entries are keyed by the page
//! number the paginator resolved and live for the configured TTL unless the
//! whole cache is flushed with [`PageCache::clear`]. Inserting into a full
//! map evicts before it grows.

use dashmap::DashMap;
use rocket::serde::json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Default bound on the number of cached pages.
pub const DEFAULT_MAX_PAGES: usize = 256;

#[derive(Debug, Clone)]
struct CachedPage {
    body: Value,
    expires_at: Instant,
}

impl CachedPage {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

#[derive(Debug)]
pub struct PageCache {
    pages: DashMap<i64, CachedPage>,
    ttl: Duration,
    max_pages: usize,
}

impl PageCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_max_pages(ttl, DEFAULT_MAX_PAGES)
    }

    pub fn with_max_pages(ttl: Duration, max_pages: usize) -> Self {
        Self {
            pages: DashMap::new(),
            ttl,
            max_pages: max_pages.max(1),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, page: i64) -> Option<Value> {
        if let Some(entry) = self.pages.get(&page) {
            if !entry.is_expired() {
                debug!(page, "index cache hit");
                return Some(entry.body.clone());
            }
        }

        // expired entries are dropped lazily
        self.pages.remove_if(&page, |_, entry| entry.is_expired());
        debug!(page, "index cache miss");
        None
    }

    pub fn insert(&self, page: i64, body: Value) {
        if !self.pages.contains_key(&page) {
            self.enforce_limit();
        }
        self.pages.insert(
            page,
            CachedPage {
                body,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Make room for one more page: sweep expired entries first, then evict
    /// the oldest tenth when the map is still full.
    fn enforce_limit(&self) {
        if self.pages.len() < self.max_pages {
            return;
        }

        self.pages.retain(|_, entry| !entry.is_expired());
        if self.pages.len() < self.max_pages {
            return;
        }

        let evict_count = (self.pages.len() / 10).max(1);
        let mut entries: Vec<(i64, Instant)> = self
            .pages
            .iter()
            .map(|entry| (*entry.key(), entry.value().expires_at))
            .collect();
        entries.sort_by_key(|&(_, expires_at)| expires_at);

        warn!(
            entries = self.pages.len(),
            evict_count, "index cache full, evicting oldest pages"
        );
        for (page, _) in entries.into_iter().take(evict_count) {
            self.pages.remove(&page);
        }
    }

    /// Drop every cached page regardless of its TTL.
    pub fn clear(&self) {
        self.pages.clear();
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
