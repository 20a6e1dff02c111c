use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::model::Table;

/// Loaded tables keyed by source id, each valid for a fixed time-to-live.
///
/// Owned by the application state; there is no global instance. Only
/// successful loads are stored, so a failed fetch is retried on the next
/// call.
#[derive(Debug)]
pub struct TableCache {
    ttl: Duration,
    entries: HashMap<String, CacheEntry>,
}

#[derive(Debug)]
struct CacheEntry {
    table: Arc<Table>,
    loaded_at: Instant,
}

impl TableCache {
    pub fn new(ttl: Duration) -> Self {
        TableCache {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached table for `source` if it is still fresh at `now`.
    pub fn get(&self, source: &str, now: Instant) -> Option<Arc<Table>> {
        let entry = self.entries.get(source)?;
        let age = now.saturating_duration_since(entry.loaded_at);
        (age < self.ttl).then(|| Arc::clone(&entry.table))
    }

    /// Return the fresh cached table, or run `load` and remember its result.
    pub fn get_or_load<E, F>(&mut self, source: &str, now: Instant, load: F) -> Result<Arc<Table>, E>
    where
        F: FnOnce() -> Result<Table, E>,
    {
        if let Some(table) = self.get(source, now) {
            log::trace!("Cache hit for {source}");
            return Ok(table);
        }

        log::debug!("Cache miss for {source}");
        let table = Arc::new(load()?);
        self.entries.insert(
            source.to_string(),
            CacheEntry {
                table: Arc::clone(&table),
                loaded_at: now,
            },
        );
        Ok(table)
    }

    /// Forget `source` so the next `get_or_load` refetches it.
    pub fn invalidate(&mut self, source: &str) {
        self.entries.remove(source);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::data::model::tests::{record, table};

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    #[test]
    fn serves_cached_table_within_ttl() {
        let mut cache = TableCache::new(DAY);
        let calls = Cell::new(0);
        let load = || -> Result<Table, ()> {
            calls.set(calls.get() + 1);
            Ok(table(vec![record("A", 1.0, 2.0)]))
        };

        let t0 = Instant::now();
        let first = cache.get_or_load("sheet", t0, load).unwrap();
        let second = cache
            .get_or_load("sheet", t0 + Duration::from_secs(3600), load)
            .unwrap();

        assert_eq!(calls.get(), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn reloads_after_expiry() {
        let mut cache = TableCache::new(DAY);
        let calls = Cell::new(0);
        let load = || -> Result<Table, ()> {
            calls.set(calls.get() + 1);
            Ok(table(vec![record("A", 1.0, 2.0)]))
        };

        let t0 = Instant::now();
        cache.get_or_load("sheet", t0, load).unwrap();
        cache.get_or_load("sheet", t0 + DAY, load).unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn errors_are_not_cached() {
        let mut cache = TableCache::new(DAY);
        let t0 = Instant::now();

        let failed: Result<_, &str> = cache.get_or_load("sheet", t0, || Err("offline"));
        assert_eq!(failed.unwrap_err(), "offline");
        assert!(cache.get("sheet", t0).is_none());

        let ok: Result<_, &str> =
            cache.get_or_load("sheet", t0, || Ok(table(vec![record("A", 1.0, 2.0)])));
        assert_eq!(ok.unwrap().len(), 1);
    }

    #[test]
    fn entries_are_per_source_and_invalidatable() {
        let mut cache = TableCache::new(DAY);
        let t0 = Instant::now();
        let one = |n: &str| -> Result<Table, ()> { Ok(table(vec![record(n, 0.0, 0.0)])) };

        cache.get_or_load("a", t0, || one("a")).unwrap();
        cache.get_or_load("b", t0, || one("b")).unwrap();
        assert_eq!(cache.get("a", t0).unwrap().records[0].name, "a");
        assert_eq!(cache.get("b", t0).unwrap().records[0].name, "b");

        cache.invalidate("a");
        assert!(cache.get("a", t0).is_none());
        assert!(cache.get("b", t0).is_some());
    }
}
