//! In-memory filter store
//!
//! A single mutex guards the whole map and is held for the full duration of
//! every operation, which makes the store linearizable.

use crate::domain::{FilterId, FilterStoreConfig};
use crate::error::StoreError;
use crate::metrics::StoreMetrics;
use crate::ports::{Filter, FilterStore};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Capacity-bounded filter store held in memory.
pub struct MemFilterStore {
    max: usize,
    filters: Mutex<HashMap<FilterId, Arc<dyn Filter>>>,
    metrics: StoreMetrics,
}

impl MemFilterStore {
    /// Create a store that accepts at most `max_filters` filters.
    pub fn new(max_filters: usize) -> Self {
        Self {
            max: max_filters,
            filters: Mutex::new(HashMap::new()),
            metrics: StoreMetrics::new(),
        }
    }

    pub fn from_config(config: &FilterStoreConfig) -> Self {
        Self::new(config.max_filters)
    }

    /// Configured maximum number of filters
    pub fn capacity(&self) -> usize {
        self.max
    }

    pub fn metrics(&self) -> &StoreMetrics {
        &self.metrics
    }

    /// True if a filter with this id is registered
    pub fn contains(&self, id: &FilterId) -> bool {
        self.filters.lock().contains_key(id)
    }
}

impl FilterStore for MemFilterStore {
    fn add(&self, filter: Arc<dyn Filter>) -> Result<(), StoreError> {
        let mut filters = self.filters.lock();

        if filters.len() >= self.max {
            self.metrics.record_rejected_capacity();
            return Err(StoreError::CapacityExceeded { max: self.max });
        }

        let id = filter.id();
        if filters.contains_key(&id) {
            self.metrics.record_rejected_duplicate();
            return Err(StoreError::AlreadyRegistered(id));
        }

        filters.insert(id, filter);
        self.metrics.record_added();
        Ok(())
    }

    fn get(&self, id: &FilterId) -> Result<Arc<dyn Filter>, StoreError> {
        self.filters
            .lock()
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound(*id))
    }

    fn remove(&self, id: &FilterId) -> Result<Arc<dyn Filter>, StoreError> {
        let removed = self
            .filters
            .lock()
            .remove(id)
            .ok_or(StoreError::NotFound(*id))?;
        self.metrics.record_removed();
        Ok(removed)
    }

    fn not_taken_since(&self, when: Instant) -> Vec<Arc<dyn Filter>> {
        self.filters
            .lock()
            .values()
            .filter(|f| f.last_taken() < when)
            .cloned()
            .collect()
    }

    fn len(&self) -> usize {
        self.filters.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::SubSink;
    use std::collections::HashSet;
    use std::time::Duration;

    struct StubFilter {
        id: FilterId,
        last_taken: Instant,
    }

    impl StubFilter {
        fn new(last_taken: Instant) -> Arc<Self> {
            Arc::new(Self {
                id: FilterId::generate().unwrap(),
                last_taken,
            })
        }

        fn with_id(id: FilterId) -> Arc<Self> {
            Arc::new(Self {
                id,
                last_taken: Instant::now(),
            })
        }
    }

    impl Filter for StubFilter {
        fn id(&self) -> FilterId {
            self.id
        }

        fn last_taken(&self) -> Instant {
            self.last_taken
        }

        fn set_sub_channel(&self, _sink: SubSink) {}

        fn clear_sub_channel(&self) {}
    }

    #[test]
    fn test_add_get_remove() {
        let store = MemFilterStore::new(10);
        let filter = StubFilter::new(Instant::now());
        let id = filter.id();

        store.add(filter.clone()).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.contains(&id));

        let got = store.get(&id).unwrap();
        assert_eq!(got.id(), id);
        assert!(Arc::ptr_eq(&got, &(filter.clone() as Arc<dyn Filter>)));

        let removed = store.remove(&id).unwrap();
        assert_eq!(removed.id(), id);
        assert!(store.is_empty());
        assert_eq!(store.get(&id).err(), Some(StoreError::NotFound(id)));
    }

    #[test]
    fn test_duplicate_rejected() {
        let store = MemFilterStore::new(10);
        let id = FilterId::generate().unwrap();
        let first = StubFilter::with_id(id);
        let second = StubFilter::with_id(id);

        store.add(first.clone()).unwrap();
        assert_eq!(store.add(second), Err(StoreError::AlreadyRegistered(id)));

        // Original is still the registered one
        let got = store.get(&id).unwrap();
        assert!(Arc::ptr_eq(&got, &(first as Arc<dyn Filter>)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.metrics().snapshot().rejected_duplicate, 1);
    }

    #[test]
    fn test_capacity() {
        let store = MemFilterStore::new(3);
        let mut ids = Vec::new();
        for _ in 0..3 {
            let f = StubFilter::new(Instant::now());
            ids.push(f.id());
            store.add(f).unwrap();
        }

        let extra = StubFilter::new(Instant::now());
        assert_eq!(
            store.add(extra.clone()),
            Err(StoreError::CapacityExceeded { max: 3 })
        );

        store.remove(&ids[0]).unwrap();
        assert!(store.add(extra).is_ok());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_capacity_checked_before_duplicate() {
        let store = MemFilterStore::new(1);
        let id = FilterId::generate().unwrap();
        store.add(StubFilter::with_id(id)).unwrap();

        assert_eq!(
            store.add(StubFilter::with_id(id)),
            Err(StoreError::CapacityExceeded { max: 1 })
        );
    }

    #[test]
    fn test_zero_capacity_rejects_everything() {
        let store = MemFilterStore::new(0);
        assert!(matches!(
            store.add(StubFilter::new(Instant::now())),
            Err(StoreError::CapacityExceeded { max: 0 })
        ));
    }

    #[test]
    fn test_remove_absent() {
        let store = MemFilterStore::new(10);
        let present = StubFilter::new(Instant::now());
        store.add(present.clone()).unwrap();

        let missing = FilterId::generate().unwrap();
        assert_eq!(
            store.remove(&missing).err(),
            Some(StoreError::NotFound(missing))
        );
        assert_eq!(store.len(), 1);
        assert!(store.contains(&present.id()));
    }

    #[test]
    fn test_not_taken_since() {
        let store = MemFilterStore::new(10);
        let base = Instant::now();
        let f1 = StubFilter::new(base);
        let f2 = StubFilter::new(base + Duration::from_secs(1));
        let f3 = StubFilter::new(base + Duration::from_secs(3));
        for f in [&f1, &f2, &f3] {
            store.add(f.clone()).unwrap();
        }

        let stale: HashSet<FilterId> = store
            .not_taken_since(base + Duration::from_secs(2))
            .iter()
            .map(|f| f.id())
            .collect();
        assert_eq!(stale, HashSet::from([f1.id(), f2.id()]));

        // Strictly before: a filter taken exactly at the cutoff is fresh
        let stale = store.not_taken_since(base + Duration::from_secs(3));
        assert_eq!(stale.len(), 2);

        assert!(store.not_taken_since(base).is_empty());
    }

    #[test]
    fn test_not_taken_since_empty_store() {
        let store = MemFilterStore::new(10);
        assert!(store.not_taken_since(Instant::now()).is_empty());
    }

    #[test]
    fn test_from_config() {
        let config = FilterStoreConfig::default().with_max_filters(42);
        let store = MemFilterStore::from_config(&config);
        assert_eq!(store.capacity(), 42);
    }
}
