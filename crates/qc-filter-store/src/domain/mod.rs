//! Domain types: identifiers and configuration.

pub mod config;
pub mod filter_id;

pub use config::{FilterStoreConfig, DEFAULT_MAX_FILTERS, DEFAULT_MAX_RESULTS};
pub use filter_id::FilterId;
