//! Error types for the filter store

use crate::domain::FilterId;
use std::time::Duration;
use thiserror::Error;

/// JSON-RPC error codes the store errors translate to.
pub mod codes {
    pub const INVALID_PARAMS: i32 = -32602;
    pub const RESOURCE_NOT_FOUND: i32 = -32001;
    pub const LIMIT_EXCEEDED: i32 = -32005;
}

/// Errors returned by [`FilterStore`](crate::ports::FilterStore) operations.
///
/// Variants are comparable so callers can match them like sentinels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("filter already registered: {0}")]
    AlreadyRegistered(FilterId),

    #[error("filter not found: {0}")]
    NotFound(FilterId),

    #[error("maximum number of filters registered: {max}")]
    CapacityExceeded { max: usize },
}

impl StoreError {
    /// JSON-RPC error code for this error.
    pub fn rpc_code(&self) -> i32 {
        match self {
            StoreError::AlreadyRegistered(_) => codes::INVALID_PARAMS,
            StoreError::NotFound(_) => codes::RESOURCE_NOT_FOUND,
            StoreError::CapacityExceeded { .. } => codes::LIMIT_EXCEEDED,
        }
    }

    /// True if the caller can make room (remove stale filters) and retry.
    pub fn is_capacity(&self) -> bool {
        matches!(self, StoreError::CapacityExceeded { .. })
    }
}

/// Errors creating or parsing a [`FilterId`].
#[derive(Debug, Error)]
pub enum FilterIdError {
    #[error("new filter id: random source failed: {0}")]
    Generation(#[from] rand::Error),

    #[error("invalid filter id hex: {0}")]
    InvalidHex(String),

    #[error("invalid filter id length: expected 32 bytes, got {0}")]
    InvalidLength(usize),
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("max_filters cannot be 0")]
    ZeroCapacity,

    #[error("max_results cannot be 0")]
    ZeroResults,

    #[error("filter_ttl cannot be 0")]
    ZeroTtl,

    #[error("reap_interval must be non-zero and at most filter_ttl ({ttl:?}), got {interval:?}")]
    InvalidReapInterval { interval: Duration, ttl: Duration },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_codes() {
        let id = FilterId::from([1u8; 32]);
        assert_eq!(StoreError::NotFound(id).rpc_code(), codes::RESOURCE_NOT_FOUND);
        assert_eq!(
            StoreError::CapacityExceeded { max: 3 }.rpc_code(),
            codes::LIMIT_EXCEEDED
        );
        assert_eq!(
            StoreError::AlreadyRegistered(id).rpc_code(),
            codes::INVALID_PARAMS
        );
    }

    #[test]
    fn test_error_display() {
        let err = StoreError::CapacityExceeded { max: 100 };
        assert_eq!(err.to_string(), "maximum number of filters registered: 100");
        assert!(err.is_capacity());
        assert!(!StoreError::NotFound(FilterId::ZERO).is_capacity());
    }
}
