//! Buffering filter
//!
//! Accumulates results until a poller takes them, or forwards them straight
//! to a subscriber when one is attached.

use crate::domain::{FilterId, FilterStoreConfig};
use crate::error::FilterIdError;
use crate::ports::{Filter, SubSink};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Instant;
use tracing::{debug, trace};

struct CollectingState {
    collected: VecDeque<serde_json::Value>,
    last_taken: Instant,
    sub: Option<SubSink>,
    dropped: u64,
}

/// A [`Filter`] that buffers at most `max_results` results.
///
/// When the buffer is full the oldest result is dropped.
pub struct CollectingFilter {
    id: FilterId,
    max_results: usize,
    state: Mutex<CollectingState>,
}

impl CollectingFilter {
    /// Create a filter with a freshly generated id.
    pub fn new(max_results: usize) -> Result<Self, FilterIdError> {
        Ok(Self::with_id(FilterId::generate()?, max_results))
    }

    pub fn from_config(config: &FilterStoreConfig) -> Result<Self, FilterIdError> {
        Self::new(config.max_results)
    }

    pub fn with_id(id: FilterId, max_results: usize) -> Self {
        Self {
            id,
            max_results,
            state: Mutex::new(CollectingState {
                collected: VecDeque::new(),
                last_taken: Instant::now(),
                sub: None,
                dropped: 0,
            }),
        }
    }

    /// Deliver a result to the subscriber, or buffer it.
    pub fn collect(&self, mut result: serde_json::Value) {
        let mut state = self.state.lock();

        if let Some(sink) = state.sub.take() {
            match sink.send(result) {
                Ok(()) => {
                    state.sub = Some(sink);
                    return;
                }
                Err(err) => {
                    debug!(filter_id = %self.id, "Subscriber closed, buffering results");
                    result = err.0;
                }
            }
        }

        if state.collected.len() >= self.max_results {
            state.collected.pop_front();
            state.dropped += 1;
            trace!(filter_id = %self.id, dropped = state.dropped, "Result buffer full");
        }
        state.collected.push_back(result);
    }

    /// Drain buffered results and mark the filter as taken now.
    pub fn take_collected(&self) -> Vec<serde_json::Value> {
        let mut state = self.state.lock();
        state.last_taken = Instant::now();
        state.collected.drain(..).collect()
    }

    /// Number of buffered results
    pub fn collected_len(&self) -> usize {
        self.state.lock().collected.len()
    }

    /// Results discarded because the buffer was full
    pub fn dropped(&self) -> u64 {
        self.state.lock().dropped
    }

    pub fn has_subscriber(&self) -> bool {
        self.state.lock().sub.is_some()
    }
}

impl Filter for CollectingFilter {
    fn id(&self) -> FilterId {
        self.id
    }

    fn last_taken(&self) -> Instant {
        self.state.lock().last_taken
    }

    /// Buffered results are flushed into the new sink first.
    fn set_sub_channel(&self, sink: SubSink) {
        let mut state = self.state.lock();
        while let Some(result) = state.collected.pop_front() {
            if let Err(err) = sink.send(result) {
                // Receiver already gone; keep what we have
                state.collected.push_front(err.0);
                return;
            }
        }
        state.sub = Some(sink);
    }

    fn clear_sub_channel(&self) {
        self.state.lock().sub = None;
    }
}
