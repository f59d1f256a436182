//! Filter identifiers.
//!
//! A [`FilterId`] is 32 bytes wide so it can travel through any API that
//! expects a block or transaction hash. Only the leading 16 bytes carry
//! entropy (a random UUID v4); the trailing 16 bytes are always zero.

use crate::error::FilterIdError;
use primitive_types::H256;
use rand::{rngs::OsRng, RngCore};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Number of random bytes in a generated id.
pub const RANDOM_BYTES: usize = 16;

/// Unique identifier of an installed filter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FilterId([u8; 32]);

impl FilterId {
    pub const ZERO: FilterId = FilterId([0u8; 32]);

    /// Generate a fresh id from the OS random source.
    ///
    /// Fails only if the random source fails. The caller decides whether
    /// to retry.
    pub fn generate() -> Result<Self, FilterIdError> {
        let mut raw = [0u8; RANDOM_BYTES];
        OsRng.try_fill_bytes(&mut raw)?;
        Ok(Self::from_uuid(
            uuid::Builder::from_random_bytes(raw).into_uuid(),
        ))
    }

    /// Left-align a UUID into a zero-padded 32-byte id.
    pub fn from_uuid(uuid: Uuid) -> Self {
        let mut id = [0u8; 32];
        id[..RANDOM_BYTES].copy_from_slice(uuid.as_bytes());
        Self(id)
    }

    /// Get as bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Get as an H256 hash
    pub fn as_hash(&self) -> H256 {
        H256(self.0)
    }
}

impl fmt::Debug for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FilterId({self})")
    }
}

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::LowerHex for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.write_str("0x")?;
        }
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for FilterId {
    type Err = FilterIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| FilterIdError::InvalidHex(e.to_string()))?;
        let raw: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| FilterIdError::InvalidLength(bytes.len()))?;
        Ok(Self(raw))
    }
}

impl From<[u8; 32]> for FilterId {
    fn from(raw: [u8; 32]) -> Self {
        Self(raw)
    }
}

impl From<FilterId> for [u8; 32] {
    fn from(id: FilterId) -> Self {
        id.0
    }
}

impl From<H256> for FilterId {
    fn from(hash: H256) -> Self {
        Self(hash.0)
    }
}

impl From<FilterId> for H256 {
    fn from(id: FilterId) -> Self {
        H256(id.0)
    }
}

impl AsRef<[u8]> for FilterId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for FilterId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FilterId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
