//! # QC Filter Store
//!
//! Registry of installed RPC filters (`eth_newFilter`,
//! `eth_newBlockFilter`, `eth_newPendingTransactionFilter`) awaiting
//! `eth_getFilterChanges` polls.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): `FilterId`, `FilterStoreConfig`
//! - **Ports Layer** (`ports/`): `Filter` capability, `FilterStore` registry
//! - **Adapters Layer** (`adapters/`):
//!   - `MemFilterStore`: mutex-guarded in-memory store
//!   - `CollectingFilter`: buffering filter with optional subscriber sink
//! - **Reaper** (`reaper`): periodic eviction of filters nobody polls
//!
//! ## Invariants
//!
//! - At most one filter per `FilterId`
//! - Never more than `max_filters` filters registered; enforced on `add`
//! - Every store operation is atomic with respect to the others
//! - Generated ids carry 16 random bytes followed by 16 zero bytes, so they
//!   fit wherever a 32-byte hash is expected
//!
//! ## Usage
//!
//! ```ignore
//! use qc_filter_store::{CollectingFilter, FilterReaper, FilterStore, FilterStoreConfig, MemFilterStore};
//! use std::sync::Arc;
//!
//! let config = FilterStoreConfig::default();
//! config.validate()?;
//!
//! let store = Arc::new(MemFilterStore::from_config(&config));
//! let reaper = FilterReaper::spawn(store.clone(), &config);
//!
//! let filter = Arc::new(CollectingFilter::from_config(&config)?);
//! store.add(filter.clone())?;
//!
//! // eth_getFilterChanges
//! let changes = filter.take_collected();
//!
//! // eth_uninstallFilter
//! store.remove(&filter.id())?;
//! reaper.shutdown().await;
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod reaper;

// Re-exports for convenience
pub use adapters::{CollectingFilter, MemFilterStore};
pub use domain::{FilterId, FilterStoreConfig};
pub use error::{ConfigError, FilterIdError, StoreError};
pub use metrics::{MetricsSnapshot, StoreMetrics};
pub use ports::{Filter, FilterStore, SubSink};
pub use reaper::{reap_stale, FilterReaper};
