//! Ports
//!
//! - [`Filter`]: capability every installed filter provides
//! - [`FilterStore`]: registry of installed filters (driving port)

use crate::domain::FilterId;
use crate::error::StoreError;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

/// Channel a filter pushes live results into for a subscriber.
pub type SubSink = mpsc::UnboundedSender<serde_json::Value>;

/// An installed filter accumulating results until a consumer takes them.
///
/// The store only ever calls [`Filter::id`] and [`Filter::last_taken`].
/// `last_taken` is queried while the store lock is held, so it must be cheap
/// and must not call back into the store.
pub trait Filter: Send + Sync {
    /// Stable identifier of this filter
    fn id(&self) -> FilterId;

    /// When the accumulated results were last collected
    fn last_taken(&self) -> Instant;

    /// Route future results to a subscriber instead of buffering them
    fn set_sub_channel(&self, sink: SubSink);

    /// Detach the subscriber, if any
    fn clear_sub_channel(&self);
}

/// Capacity-bounded registry of filters.
///
/// Implementations must be linearizable: every operation appears to happen
/// atomically in a single global order.
pub trait FilterStore: Send + Sync {
    /// Register a filter.
    ///
    /// Fails with [`StoreError::CapacityExceeded`] if the store is full
    /// (checked first), or [`StoreError::AlreadyRegistered`] if a filter
    /// with the same id is present.
    fn add(&self, filter: Arc<dyn Filter>) -> Result<(), StoreError>;

    /// Look up a filter by id
    fn get(&self, id: &FilterId) -> Result<Arc<dyn Filter>, StoreError>;

    /// Deregister a filter, returning it
    fn remove(&self, id: &FilterId) -> Result<Arc<dyn Filter>, StoreError>;

    /// Filters whose results have not been taken since `when` (strictly
    /// before). Order is unspecified.
    fn not_taken_since(&self, when: Instant) -> Vec<Arc<dyn Filter>>;

    /// Number of registered filters
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
