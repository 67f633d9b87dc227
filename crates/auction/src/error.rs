use alloy::primitives::Address;
use pepc_bundle::{BundleError, StoreError};
use pepc_types::BidId;

/// Errors returned by the [`BidLedger`].
///
/// [`BidLedger`]: crate::BidLedger
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The id generator produced an id that was already issued. This is an
    /// internal invariant break; the operation that hit it is abandoned.
    #[error("bid id {0} was issued twice")]
    DuplicateBidId(BidId),

    /// The target block is being built and accepts no further bids.
    #[error("block {0} is being built")]
    BlockBuilding(u64),

    /// The target block is sealed and accepts no further bids.
    #[error("block {0} is sealed")]
    BlockSealed(u64),

    /// The target block has been pruned.
    #[error("block {target_block} has expired, oldest live block is {oldest_live}")]
    BlockExpired {
        /// The requested block.
        target_block: u64,
        /// The oldest block still accepting bids.
        oldest_live: u64,
    },

    /// A seal was attempted for a block that is not being built.
    #[error("block {0} is not being built")]
    NotBuilding(u64),
}

/// Errors that abort a single build call. No partial result is produced and
/// the block returns to open.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The payload could not be encoded.
    #[error("failed to encode payload for block {target_block}: {source}")]
    Encoding {
        /// The block being built.
        target_block: u64,
        /// The coder error.
        #[source]
        source: Box<dyn core::error::Error + Send + Sync + 'static>,
    },

    /// An eligible bundle could not be read, and strict builds are enabled.
    #[error("bid {bid_id} is unreadable by the builder: {source}")]
    Unreadable {
        /// The unreadable bid.
        bid_id: BidId,
        /// Why it could not be read.
        #[source]
        source: StoreError,
    },

    /// Ledger error.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl BuildError {
    /// True if this is an encoding failure.
    pub const fn is_encoding_failure(&self) -> bool {
        matches!(self, Self::Encoding { .. })
    }
}

/// Errors returned by the [`Auction`].
///
/// [`Auction`]: crate::Auction
#[derive(Debug, thiserror::Error)]
pub enum AuctionError {
    /// The submitted bundle is malformed.
    #[error("invalid bundle: {0}")]
    InvalidBundle(#[from] BundleError),

    /// The caller may not submit under the requested sender allow-list.
    #[error("{0} is not an allowed sender")]
    Unauthorized(Address),

    /// Bundle store error.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Ledger error.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Build error.
    #[error(transparent)]
    Build(#[from] BuildError),
}

impl AuctionError {
    /// True if the error is an access-control failure.
    pub const fn is_unauthorized(&self) -> bool {
        match self {
            Self::Unauthorized(_) => true,
            Self::Store(err) => err.is_unauthorized(),
            Self::Build(BuildError::Unreadable { source, .. }) => source.is_unauthorized(),
            _ => false,
        }
    }

    /// True if the error is an encoding failure.
    pub const fn is_encoding_failure(&self) -> bool {
        matches!(self, Self::Build(BuildError::Encoding { .. }))
    }
}
