use alloy::primitives::{keccak256, FixedBytes, B256};
use core::fmt;
use serde::{Deserialize, Serialize};

/// Opaque 16-byte bid identifier.
///
/// Identifiers are generated from random v4 UUIDs and carry no ordering
/// semantics beyond the lexicographic byte order used to break ties between
/// equal bids.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BidId(FixedBytes<16>);

impl BidId {
    /// Create a bid id from raw bytes.
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(FixedBytes(bytes))
    }

    /// Generate a fresh random bid id.
    pub fn random() -> Self {
        Self::new(uuid::Uuid::new_v4().into_bytes())
    }

    /// Get the id as a byte slice.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0 .0
    }

    /// Get the id as [`FixedBytes`], the form used in event bindings.
    pub const fn as_fixed(&self) -> FixedBytes<16> {
        self.0
    }
}

impl From<FixedBytes<16>> for BidId {
    fn from(bytes: FixedBytes<16>) -> Self {
        Self(bytes)
    }
}

impl From<BidId> for FixedBytes<16> {
    fn from(id: BidId) -> Self {
        id.0
    }
}

impl fmt::Display for BidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for BidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BidId").field(&format_args!("{}", self.0)).finish()
    }
}

/// A commitment to submitted bundle bytes.
///
/// This is what listeners see in place of the bundle itself. It is the
/// keccak256 hash of the exact bytes the submitter sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BundleRef(B256);

impl BundleRef {
    /// Commit to a bundle's raw bytes.
    pub fn commit(bundle_bytes: &[u8]) -> Self {
        Self(keccak256(bundle_bytes))
    }

    /// Get the commitment hash.
    pub const fn hash(&self) -> B256 {
        self.0
    }

    /// Get the commitment as a byte slice.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl fmt::Display for BundleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
