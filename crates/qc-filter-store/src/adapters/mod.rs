//! Adapters
//!
//! - `MemFilterStore`: in-memory [`FilterStore`](crate::ports::FilterStore)
//! - `CollectingFilter`: buffering [`Filter`](crate::ports::Filter)

pub mod collecting;
pub mod memory;

pub use collecting::CollectingFilter;
pub use memory::MemFilterStore;
