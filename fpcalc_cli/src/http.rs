//! Pieces shared by the web-service clients: the HTTP client and a
//! time-limited in-process cache.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use reqwest::Client;

use crate::error::CliResult;

/// Client sent as `FpCalc/<version>` with a request timeout.
pub(crate) fn client(timeout_secs: u64) -> CliResult<Client> {
    Ok(Client::builder()
        .user_agent(format!("FpCalc/{}", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

/// Coordinates as sent on the wire and used in cache keys.
pub(crate) fn coordinate(value: f64) -> String {
    format!("{:.6}", value)
}

struct Entry<V> {
    value: V,
    stored_at: Instant,
}

/// Memo of successful lookups. Expired entries are dropped on lookup and
/// swept on every insert.
pub(crate) struct TtlCache<V> {
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub(crate) fn new(ttl_secs: u64) -> Self {
        TtlCache {
            ttl: Duration::from_secs(ttl_secs),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock().ok()?;
        match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub(crate) fn insert(&self, key: String, value: V) {
        if let Ok(mut entries) = self.entries.lock() {
            let ttl = self.ttl;
            entries.retain(|_, entry| entry.stored_at.elapsed() < ttl);
            entries.insert(
                key,
                Entry {
                    value,
                    stored_at: Instant::now(),
                },
            );
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_rounding() {
        assert_eq!(coordinate(37.80423914364421), "37.804239");
        assert_eq!(coordinate(-122.27615639197262), "-122.276156");
    }

    #[test]
    fn test_fresh_entry_returned() {
        let cache = TtlCache::new(3600);
        cache.insert("a".to_string(), 1.5);
        assert_eq!(cache.get("a"), Some(1.5));
        assert_eq!(cache.get("b"), None);
    }

    #[test]
    fn test_expired_entry_removed_on_lookup() {
        let cache = TtlCache::new(0);
        cache.insert("a".to_string(), 1.5);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_insert_sweeps_expired_entries() {
        let cache = TtlCache::new(0);
        for i in 0..10 {
            cache.insert(format!("key-{}", i), i);
        }
        // every earlier entry has expired by the time the next one is stored
        assert_eq!(cache.len(), 1);
    }
}
