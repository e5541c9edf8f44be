//! Reverse resolution caching.
//!
//! This module provides [`ReverseCache`]: an LRU cache of
//! `(view name, arguments) → URL` results, so that a page whose ancestors are
//! reversed on every request does not rebuild the same addresses over and
//! over. It is gated behind the `cache` feature flag and uses the [`lru`]
//! crate internally.
//!
//! Only successful lookups are cached; a miss is always recomputed. The cache
//! is cleared whenever a route is registered.
//!
//! [`CacheStats`] reports how often ancestor addresses were served from the
//! cache.
//!
//! # Examples
//!
//! ```
//! use view_breadcrumbs::cache::ReverseCache;
//! use view_breadcrumbs::ViewArgs;
//!
//! let mut cache = ReverseCache::new();
//! let args = ViewArgs::positional(["42"]);
//! cache.insert("order_detail", &args, "/orders/42/".to_string());
//!
//! assert_eq!(cache.get("order_detail", &args).as_deref(), Some("/orders/42/"));
//! assert_eq!(cache.stats().hits, 1);
//! ```

use crate::params::ViewArgs;
use crate::{debug_log, trace_log};
use lru::LruCache;
use std::num::NonZeroUsize;

/// Hit, miss and invalidation counters of a [`ReverseCache`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of lookups answered from the cache.
    pub hits: usize,
    /// Number of lookups that had to be computed.
    pub misses: usize,
    /// Number of full cache invalidations (via [`ReverseCache::clear`]).
    pub invalidations: usize,
}

impl CacheStats {
    /// Return the hit rate as a value in `0.0..=1.0`.
    ///
    /// Returns `0.0` if no lookups have been performed.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache for reverse resolution results.
#[derive(Debug)]
pub struct ReverseCache {
    entries: LruCache<String, String>,
    stats: CacheStats,
}

impl ReverseCache {
    const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000) {
        Some(capacity) => capacity,
        None => NonZeroUsize::MIN,
    };

    /// Create a cache with the default capacity (1000 entries).
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a cache with a custom capacity.
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
            stats: CacheStats::default(),
        }
    }

    fn key(name: &str, args: &ViewArgs) -> String {
        format!("{name}|{args}")
    }

    /// Look up a previously reversed URL. Updates hit/miss stats.
    pub fn get(&mut self, name: &str, args: &ViewArgs) -> Option<String> {
        if let Some(url) = self.entries.get(&Self::key(name, args)) {
            self.stats.hits += 1;
            trace_log!("Reverse cache hit for '{}' ({})", name, args);
            Some(url.clone())
        } else {
            self.stats.misses += 1;
            trace_log!("Reverse cache miss for '{}' ({})", name, args);
            None
        }
    }

    /// Remember the URL reversed for `name` with `args`.
    pub fn insert(&mut self, name: &str, args: &ViewArgs, url: String) {
        self.entries.push(Self::key(name, args), url);
    }

    /// Drop every entry and increment the invalidation counter.
    pub fn clear(&mut self) {
        let removed = self.entries.len();
        self.entries.clear();
        self.stats.invalidations += 1;
        debug_log!(
            "Reverse cache cleared: {} entries removed ({} total invalidations, hit rate: {:.1}%)",
            removed,
            self.stats.invalidations,
            self.stats.hit_rate() * 100.0
        );
    }

    /// Counters so far.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Number of cached URLs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ReverseCache {
    fn default() -> Self {
        Self::new()
    }
}
