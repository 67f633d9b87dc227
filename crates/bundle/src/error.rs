use alloy::eips::eip2718::Eip2718Error;
use pepc_types::BidId;

/// Errors that can occur while decoding and recovering a single transaction
/// in a bundle.
#[derive(Debug, thiserror::Error)]
pub enum RecoverError {
    /// Error occurred while decoding the transaction.
    #[error(transparent)]
    Decoding(#[from] Eip2718Error),

    /// Error occurred while recovering the signature.
    #[error(transparent)]
    Recovering(#[from] alloy::consensus::crypto::RecoveryError),
}

/// A bundle failed validation. Surfaced to the submitter, never stored.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    /// Bundle is empty. Bundles must contain at least one transaction.
    #[error("bundle must contain at least one transaction")]
    EmptyBundle,

    /// A transaction in the bundle could not be decoded or recovered.
    #[error("failed to decode transaction. Index: {index}, Error: {inner}")]
    Transaction {
        /// Index of the transaction in the bundle.
        index: usize,
        /// Error decoding the transaction.
        #[source]
        inner: RecoverError,
    },

    /// Refund percent is outside of `[0, 100]`.
    #[error("refund percent {0} exceeds 100")]
    RefundOutOfRange(u8),

    /// Bundle bytes are not a well-formed bundle document.
    #[error("malformed bundle: {0}")]
    Json(#[from] serde_json::Error),
}

impl BundleError {
    /// Creates a new [`BundleError::Transaction`].
    pub fn transaction(inner: impl Into<RecoverError>, index: usize) -> Self {
        Self::Transaction { inner: inner.into(), index }
    }
}

/// Which side of the store an access check guarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Writing a bundle.
    Submit,
    /// Reading bundle plaintext.
    Peek,
}

impl core::fmt::Display for Access {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Submit => f.write_str("submit"),
            Self::Peek => f.write_str("peek"),
        }
    }
}

/// Errors returned by the [`BundleStore`].
///
/// [`BundleStore`]: crate::BundleStore
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The caller is not on the relevant allow-list.
    #[error("{identity} may not {access} bid {bid_id}")]
    Unauthorized {
        /// The bid the caller tried to access.
        bid_id: BidId,
        /// The caller identity.
        identity: alloy::primitives::Address,
        /// The kind of access attempted.
        access: Access,
    },

    /// No bundle is stored for the bid.
    #[error("no bundle stored for bid {0}")]
    NotFound(BidId),

    /// A bundle is already stored for the bid. Ids are never reused, so this
    /// indicates a broken id generator.
    #[error("bundle already stored for bid {0}")]
    DuplicateRecord(BidId),
}

impl StoreError {
    /// True if the error is an access-control failure.
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}
