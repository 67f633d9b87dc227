#![allow(missing_docs)]
use crate::{BidId, BundleRef};
use alloy::primitives::Bytes;

mod events {
    alloy::sol! {
        /// Emitted when a bundle is accepted. `bundle` carries the bundle
        /// reference, never the plaintext.
        #[derive(Debug, PartialEq, Eq)]
        event SendBundleTx(bytes16 bidId, bytes bundle);

        /// Emitted when a top-of-block payload is sealed.
        #[derive(Debug, PartialEq, Eq)]
        event BuildBlock(bytes16 bidId, bytes data);

        #[derive(Debug, PartialEq, Eq)]
        struct SolWithdrawal {
            uint64 index;
            uint64 validator;
            address recipient;
            uint64 amount;
        }

        #[derive(Debug, PartialEq, Eq)]
        struct BuildBlockArgs {
            uint64 slot;
            bytes proposerPubkey;
            bytes32 parent;
            uint64 timestamp;
            address feeRecipient;
            uint64 gasLimit;
            bytes32 random;
            SolWithdrawal[] withdrawals;
        }
    }
}
pub use events::{BuildBlock, BuildBlockArgs, SendBundleTx, SolWithdrawal};

impl SendBundleTx {
    /// Create the submission event for a bid.
    pub fn for_bid(bid_id: BidId, reference: BundleRef) -> Self {
        Self { bidId: bid_id.as_fixed(), bundle: Bytes::copy_from_slice(reference.as_slice()) }
    }

    /// Get the bid id.
    pub fn bid_id(&self) -> BidId {
        self.bidId.into()
    }

    /// Get the bundle reference bytes.
    pub const fn bundle(&self) -> &Bytes {
        &self.bundle
    }
}

impl BuildBlock {
    /// Create the build event for a sealed payload.
    pub const fn for_payload(bid_id: BidId, data: Bytes) -> Self {
        Self { bidId: bid_id.as_fixed(), data }
    }

    /// Get the bid id of the composite build.
    pub fn bid_id(&self) -> BidId {
        self.bidId.into()
    }

    /// Get the composed payload bytes.
    pub const fn data(&self) -> &Bytes {
        &self.data
    }
}
