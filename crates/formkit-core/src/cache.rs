//! Time-bounded cache of reference option lists.
//!
//! One cache is built per application and shared by reference between the
//! edit and read-only paths. Entries expire lazily on lookup; there is no
//! background sweep and no capacity bound.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::types::OptionItem;

/// Entries older than this are dropped on lookup.
pub const DEFAULT_OPTIONS_TTL: Duration = Duration::from_millis(5 * 60 * 1000);

/// Millisecond clock used for entry timestamps.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Clock advanced by hand, for deterministic expiry.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(start_millis),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(by.as_millis() as i64, Ordering::SeqCst);
    }

    pub fn set(&self, millis: i64) {
        self.now.store(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    options: Vec<OptionItem>,
    stored_at: i64,
}

pub struct OptionsCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl OptionsCache {
    pub fn new(clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Options stored under `key`, unless missing or expired. An expired
    /// entry is evicted.
    pub fn get(&self, key: &str) -> Option<Vec<OptionItem>> {
        let mut entries = self.lock();
        let entry = entries.get(key)?;
        let age = self.clock.now_millis() - entry.stored_at;
        if age > self.ttl.as_millis() as i64 {
            entries.remove(key);
            tracing::debug!(key, age, "options cache entry expired");
            return None;
        }
        Some(entry.options.clone())
    }

    /// Store `options` under `key`, replacing any previous entry.
    pub fn set(&self, key: impl Into<String>, options: Vec<OptionItem>) {
        let stored_at = self.clock.now_millis();
        self.lock().insert(key.into(), CacheEntry { options, stored_at });
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        // A poisoned map still holds valid entries.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for OptionsCache {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock), DEFAULT_OPTIONS_TTL)
    }
}

impl std::fmt::Debug for OptionsCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionsCache")
            .field("entries", &self.len())
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Cache key for options sourced from another form's field.
pub fn form_reference_cache_key(form_name: &str, field_name: &str) -> String {
    format!("formRef:{}:{}", escape_part(form_name), escape_part(field_name))
}

/// Cache key for options sourced from an API endpoint.
pub fn api_reference_cache_key(endpoint: &str, label_field: &str, value_field: &str) -> String {
    format!(
        "apiRef:{}:{}:{}",
        escape_part(endpoint),
        escape_part(label_field),
        escape_part(value_field)
    )
}

/// Escape `:` so that distinct parameter tuples never share a key
/// (`"a:b" + "c"` vs `"a" + "b:c"`). Parts without `:` or `%` are unchanged.
fn escape_part(part: &str) -> std::borrow::Cow<'_, str> {
    if part.contains([':', '%']) {
        part.replace('%', "%25").replace(':', "%3A").into()
    } else {
        part.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TTL_MS: i64 = 300_000;

    fn cache_at(start: i64) -> (Arc<ManualClock>, OptionsCache) {
        let clock = Arc::new(ManualClock::new(start));
        let cache = OptionsCache::new(clock.clone(), DEFAULT_OPTIONS_TTL);
        (clock, cache)
    }

    fn opts() -> Vec<OptionItem> {
        vec![OptionItem::new("Alice", "u1")]
    }

    #[test]
    fn entry_survives_until_ttl() {
        let (clock, cache) = cache_at(1_000);
        cache.set("k", opts());
        clock.set(1_000 + TTL_MS - 1);
        assert_eq!(cache.get("k"), Some(opts()));
        clock.set(1_000 + TTL_MS);
        assert_eq!(cache.get("k"), Some(opts()));
    }

    #[test]
    fn expired_entry_is_evicted() {
        let (clock, cache) = cache_at(1_000);
        cache.set("k", opts());
        clock.set(1_000 + TTL_MS + 1);
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
        clock.set(1_000);
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn set_overwrites_with_fresh_timestamp() {
        let (clock, cache) = cache_at(0);
        cache.set("k", opts());
        clock.advance(Duration::from_millis(200_000));
        cache.set("k", vec![OptionItem::new("Bob", "u2")]);
        clock.advance(Duration::from_millis(200_000));
        assert_eq!(cache.get("k").unwrap()[0].label, "Bob");
    }

    #[test]
    fn missing_key() {
        let (_, cache) = cache_at(0);
        assert_eq!(cache.get("nope"), None);
    }

    #[test]
    fn keys_are_deterministic() {
        assert_eq!(
            form_reference_cache_key("intake", "owner"),
            form_reference_cache_key("intake", "owner")
        );
        assert_eq!(form_reference_cache_key("intake", "owner"), "formRef:intake:owner");
        assert_ne!(
            form_reference_cache_key("intake", "owner"),
            form_reference_cache_key("intake", "owner2")
        );
        assert_eq!(
            api_reference_cache_key("/api/users", "name", "_id"),
            "apiRef:/api/users:name:_id"
        );
    }

    #[test]
    fn keys_do_not_collide_across_tuples() {
        assert_ne!(
            form_reference_cache_key("a:b", "c"),
            form_reference_cache_key("a", "b:c")
        );
        assert_ne!(
            api_reference_cache_key("http://x", "a", "b"),
            api_reference_cache_key("http", "//x:a", "b")
        );
        assert_ne!(
            form_reference_cache_key("a%3A", "b"),
            form_reference_cache_key("a:", "b")
        );
    }
}
