//! Bounded result cache with per-entry expiry and LRU eviction.
//!
//! The cache memoizes result lists for identical queries so repeated searches
//! inside a short window do not hit the upstream API again. It is constructed
//! explicitly by whoever owns the session (the server process, a CLI run) and
//! handed around as a [`SharedCache`].
//!
//! Every operation is synchronous and infallible. Absence is `None`, never an
//! error. The shared handle uses a `std::sync::Mutex`; a guard must never be
//! held across an `.await`.

use crate::types::DomainResult;
use lru::LruCache;
use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// One shared cache of result lists, as used by the lookup service.
pub type SharedCache = Arc<Mutex<ResultCache<Vec<DomainResult>>>>;

struct CacheEntry<V> {
    value: V,
    /// `None` when `now + ttl` is past the clock's range
    expiry: Option<Instant>,
}

/// Counters describing cache behaviour since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub expirations: u64,
    pub evictions: u64,
    pub size: usize,
    pub capacity: usize,
    pub enabled: bool,
}

/// Key -> value store bounded by entry count and entry age.
///
/// Recency order is the eviction signal: both `get` hits and `set` count as
/// a touch, so this is a true LRU rather than insertion-order FIFO.
pub struct ResultCache<V> {
    entries: LruCache<String, CacheEntry<V>>,
    ttl: Duration,
    enabled: bool,
    stats: CacheStats,
}

impl<V: Clone> ResultCache<V> {
    /// Create an enabled cache. A capacity of zero is raised to one.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            ttl,
            enabled: true,
            stats: CacheStats::default(),
        }
    }

    /// Look up an unexpired value and promote it to most recently used.
    ///
    /// An expired entry found here is removed as part of the miss.
    pub fn get(&mut self, key: &str) -> Option<V> {
        if !self.enabled {
            return None;
        }

        let now = Instant::now();
        let expired = match self.entries.peek(key) {
            None => {
                self.stats.misses += 1;
                debug!(key, "cache miss");
                return None;
            }
            Some(entry) => entry.expiry.is_some_and(|expiry| now >= expiry),
        };

        if expired {
            self.entries.pop(key);
            self.stats.misses += 1;
            self.stats.expirations += 1;
            debug!(key, "cache entry expired");
            return None;
        }

        self.stats.hits += 1;
        debug!(key, "cache hit");
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Insert or overwrite a value with `expiry = now + ttl`.
    ///
    /// Inserting a new key into a full cache evicts the least recently
    /// touched entry first. No-op while disabled.
    pub fn set<K: Into<String>>(&mut self, key: K, value: V) {
        if !self.enabled {
            return;
        }

        let key = key.into();
        let entry = CacheEntry {
            value,
            expiry: Instant::now().checked_add(self.ttl),
        };

        if let Some((displaced, _)) = self.entries.push(key.clone(), entry) {
            if displaced != key {
                self.stats.evictions += 1;
                debug!(evicted = %displaced, "cache evicted least recently used entry");
            }
        }
    }

    /// Remove one entry. Works whether or not the cache is enabled.
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.pop(key).is_some()
    }

    /// Remove every entry. Works whether or not the cache is enabled.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Toggle caching. Disabling also drops every entry, so a later
    /// re-enable can never serve something stored before the disable.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.entries.clear();
        }
    }

    /// Snapshot of the counters plus current size.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.size(),
            capacity: self.capacity(),
            enabled: self.enabled,
            ..self.stats
        }
    }

    /// Wrap a new cache in the shared handle type.
    pub fn shared(capacity: usize, ttl: Duration) -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(Self::new(capacity, ttl)))
    }
}

/// Build a deterministic cache key from a base string and a parameter map.
///
/// Parameter names are sorted lexicographically and joined as
/// `name=value` pairs, so the order in which the map was built never
/// matters. Absent values are treated as empty strings.
///
/// # Examples
///
/// ```rust
/// use domain_scout_lib::generate_key;
///
/// let a = generate_key("search", [("query", Some("a")), ("x", Some("1"))]);
/// let b = generate_key("search", [("x", Some("1")), ("query", Some("a"))]);
/// assert_eq!(a, b);
/// assert_eq!(a, "search:query=a&x=1");
/// ```
pub fn generate_key<I, K, V>(base: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, Option<V>)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let sorted: BTreeMap<String, String> = params
        .into_iter()
        .map(|(name, value)| {
            (
                name.as_ref().to_string(),
                value.as_ref().map(|v| v.as_ref().to_string()).unwrap_or_default(),
            )
        })
        .collect();

    if sorted.is_empty() {
        return base.to_string();
    }

    let pairs: Vec<String> = sorted
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect();
    format!("{}:{}", base, pairs.join("&"))
}
