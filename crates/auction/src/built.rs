use crate::Bid;
use alloy::primitives::{keccak256, Bytes, B256, U256};
use core::fmt;
use pepc_bundle::ConfidentialBundle;
use pepc_types::{BidId, BlockArgs, BuildBlock};
use serde::Serialize;
use tracing::trace;

/// A bundle placed in a top-of-block payload, with the metadata it was
/// submitted with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TobBundle {
    /// The winning bid.
    pub bid_id: BidId,
    /// The bid value.
    pub volume: U256,
    /// The bundle transactions, in order.
    pub txs: Vec<Bytes>,
    /// Transactions allowed to revert.
    pub reverting_hashes: Vec<B256>,
    /// Refund percent, carried through unchanged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_percent: Option<u8>,
}

/// An in-progress top-of-block payload.
///
/// Bundles are ingested in auction order. The payload itself has no opinion
/// on ordering.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TobPayload {
    /// The block the payload is built for.
    target_block: u64,
    /// Arguments of the block.
    block_args: BlockArgs,
    /// Bundles, in auction order.
    bundles: Vec<TobBundle>,
}

impl fmt::Debug for TobPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TobPayload")
            .field("target_block", &self.target_block)
            .field("bundles", &self.bundles.len())
            .field("transactions", &self.tx_count())
            .finish_non_exhaustive()
    }
}

impl TobPayload {
    /// Create a new empty payload.
    pub const fn new(target_block: u64, block_args: BlockArgs) -> Self {
        Self { target_block, block_args, bundles: Vec::new() }
    }

    /// Gets the block number the payload targets.
    pub const fn target_block(&self) -> u64 {
        self.target_block
    }

    /// Gets the block arguments.
    pub const fn block_args(&self) -> &BlockArgs {
        &self.block_args
    }

    /// Get the bundles in the payload.
    #[allow(clippy::missing_const_for_fn)] // false positive, const deref
    pub fn bundles(&self) -> &[TobBundle] {
        &self.bundles
    }

    /// Get the number of transactions in the payload.
    pub fn tx_count(&self) -> usize {
        self.bundles.iter().map(|b| b.txs.len()).sum()
    }

    /// Check if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    /// Append a placed bundle to the payload.
    pub fn push(&mut self, bundle: TobBundle) {
        self.bundles.push(bundle);
    }

    /// Append a revealed bundle and its winning bid to the payload.
    pub fn ingest(&mut self, bid: &Bid, bundle: &ConfidentialBundle) {
        trace!(bid_id = %bid.id(), txs = bundle.len(), "adding bundle to payload");
        self.push(TobBundle {
            bid_id: bid.id(),
            volume: bid.volume(),
            txs: bundle.txs.clone(),
            reverting_hashes: bundle.reverting_hashes.clone(),
            refund_percent: bundle.refund_percent,
        });
    }
}

/// A sealed top-of-block build.
#[derive(Clone, PartialEq, Eq)]
pub struct BuildResult {
    /// Id of the composite build bid.
    bid_id: BidId,
    /// The block the payload was built for.
    target_block: u64,
    /// The encoded payload.
    payload: Bytes,
    /// Hash of the encoded payload.
    payload_hash: B256,
    /// Included bids, in auction order.
    included: Vec<BidId>,
    /// Eligible bids left out of the payload.
    excluded: Vec<BidId>,
}

impl fmt::Debug for BuildResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildResult")
            .field("bid_id", &self.bid_id)
            .field("target_block", &self.target_block)
            .field("payload_hash", &self.payload_hash)
            .field("included", &self.included.len())
            .field("excluded", &self.excluded.len())
            .finish_non_exhaustive()
    }
}

impl BuildResult {
    /// Seal an encoded payload.
    pub fn new(
        bid_id: BidId,
        target_block: u64,
        payload: Bytes,
        included: Vec<BidId>,
        excluded: Vec<BidId>,
    ) -> Self {
        let payload_hash = keccak256(&payload);
        Self { bid_id, target_block, payload, payload_hash, included, excluded }
    }

    /// Id of the composite build bid.
    pub const fn bid_id(&self) -> BidId {
        self.bid_id
    }

    /// The block the payload was built for.
    pub const fn target_block(&self) -> u64 {
        self.target_block
    }

    /// The encoded payload.
    pub const fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Hash of the encoded payload.
    pub const fn payload_hash(&self) -> B256 {
        self.payload_hash
    }

    /// Included bids, in auction order.
    #[allow(clippy::missing_const_for_fn)]
    pub fn included(&self) -> &[BidId] {
        &self.included
    }

    /// Eligible bids that were left out: unreadable by the builder, or beyond
    /// the bundle cap.
    #[allow(clippy::missing_const_for_fn)]
    pub fn excluded(&self) -> &[BidId] {
        &self.excluded
    }

    /// The build event for this result.
    pub fn event(&self) -> BuildBlock {
        BuildBlock::for_payload(self.bid_id, self.payload.clone())
    }
}
