//! Screenshot load tracking.
//!
//! Cards render a placeholder per screenshot until the image proxy confirms
//! the asset loads. Confirmed URLs go into a bounded LRU so a card that
//! scrolls back into view completes instantly instead of re-probing.

use lru::LruCache;
use std::collections::HashSet;
use std::num::NonZeroUsize;

const LOADED_CACHE_CAPACITY: usize = 512;

#[derive(Debug)]
pub struct ScreenshotTracker {
    loaded: LruCache<String, ()>,
    in_flight: HashSet<String>,
}

impl Default for ScreenshotTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenshotTracker {
    pub fn new() -> Self {
        // Capacity is a compile-time constant, never zero
        let capacity = NonZeroUsize::new(LOADED_CACHE_CAPACITY)
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            loaded: LruCache::new(capacity),
            in_flight: HashSet::new(),
        }
    }

    /// Has this URL already been confirmed? Non-mutating so render code can
    /// call it freely.
    pub fn is_loaded(&self, url: &str) -> bool {
        self.loaded.contains(url)
    }

    /// Should a probe be spawned for this URL right now? Marks it in-flight
    /// on `true` so repeated renders spawn at most one probe per URL.
    pub fn needs_probe(&mut self, url: &str) -> bool {
        if self.loaded.contains(url) || self.in_flight.contains(url) {
            return false;
        }
        self.in_flight.insert(url.to_string());
        true
    }

    /// Record a confirmed load.
    pub fn mark_loaded(&mut self, url: &str) {
        self.in_flight.remove(url);
        self.loaded.put(url.to_string(), ());
    }

    /// Record a failed probe. The URL becomes eligible for another attempt
    /// the next time its card is rendered.
    pub fn mark_failed(&mut self, url: &str) {
        self.in_flight.remove(url);
    }

    /// Loaded-count out of `urls` for a card's "n/m" progress hint.
    pub fn loaded_count(&self, urls: &[String]) -> usize {
        urls.iter().filter(|u| self.loaded.contains(u.as_str())).count()
    }
}
