use crate::{
    Bid, BidLedger, BuildError, BuildResult, BuildTicket, ConfidentialityGate, JsonCoder,
    LedgerError, PayloadCoder, TobPayload,
};
use alloy::primitives::Address;
use core::cmp::Ordering;
use pepc_types::{config::AuctionConfig, BidId, BlockArgs};
use std::{num::NonZeroUsize, sync::Arc};
use tracing::{debug, info, instrument, warn};

/// The auction order: volume descending, then bid id ascending.
///
/// This is a total order on bids with distinct ids, so the composed payload
/// does not depend on arrival order.
pub fn auction_order(a: &Bid, b: &Bid) -> Ordering {
    b.volume().cmp(&a.volume()).then_with(|| a.id().cmp(&b.id()))
}

/// The outcome of a successful [`TobBuilder::build`] call.
#[derive(Debug, Clone)]
pub enum BuildOutcome {
    /// The block was built and sealed by this call.
    Sealed(Arc<BuildResult>),
    /// The block had already been sealed. Contains the prior result.
    AlreadySealed(Arc<BuildResult>),
    /// No readable bids targeted the block. The block stays open.
    NoEligibleBids {
        /// The block that was built.
        target_block: u64,
        /// Eligible bids that were excluded.
        excluded: Vec<BidId>,
    },
}

impl BuildOutcome {
    /// Get the build result, if the block is sealed.
    pub const fn result(&self) -> Option<&Arc<BuildResult>> {
        match self {
            Self::Sealed(result) | Self::AlreadySealed(result) => Some(result),
            Self::NoEligibleBids { .. } => None,
        }
    }

    /// True if this call sealed the block.
    pub const fn is_fresh(&self) -> bool {
        matches!(self, Self::Sealed(_))
    }

    /// True if there was nothing to build.
    pub const fn is_no_eligible_bids(&self) -> bool {
        matches!(self, Self::NoEligibleBids { .. })
    }
}

/// Returns a block to open unless the build sealed it.
struct BuildGuard<'a> {
    ledger: &'a BidLedger,
    target_block: u64,
    sealed: bool,
}

impl<'a> BuildGuard<'a> {
    const fn new(ledger: &'a BidLedger, target_block: u64) -> Self {
        Self { ledger, target_block, sealed: false }
    }

    fn seal(mut self, result: Arc<BuildResult>) -> Result<(), LedgerError> {
        self.ledger.seal(self.target_block, result)?;
        self.sealed = true;
        Ok(())
    }
}

impl Drop for BuildGuard<'_> {
    fn drop(&mut self) {
        if !self.sealed {
            self.ledger.reopen(self.target_block);
        }
    }
}

/// Composes the readable bids for a block into a single top-of-block payload.
#[derive(Debug, Clone)]
pub struct TobBuilder<C = JsonCoder> {
    ledger: Arc<BidLedger>,
    gate: ConfidentialityGate,
    identity: Address,
    strict: bool,
    max_bundles: Option<NonZeroUsize>,
    coder: C,
}

impl TobBuilder {
    /// Create a builder that encodes payloads as JSON.
    pub const fn new(
        ledger: Arc<BidLedger>,
        gate: ConfidentialityGate,
        config: &AuctionConfig,
    ) -> Self {
        Self {
            ledger,
            gate,
            identity: config.builder_identity,
            strict: config.strict_build,
            max_bundles: config.max_bundles,
            coder: JsonCoder,
        }
    }
}

impl<C> TobBuilder<C> {
    /// Replace the payload coder.
    pub fn with_coder<D: PayloadCoder>(self, coder: D) -> TobBuilder<D> {
        TobBuilder {
            ledger: self.ledger,
            gate: self.gate,
            identity: self.identity,
            strict: self.strict,
            max_bundles: self.max_bundles,
            coder,
        }
    }

    /// The identity presented to the gate.
    pub const fn identity(&self) -> Address {
        self.identity
    }

    /// Get a reference to the coder.
    pub const fn coder(&self) -> &C {
        &self.coder
    }

    /// Get the ledger the builder reads from.
    pub const fn ledger(&self) -> &Arc<BidLedger> {
        &self.ledger
    }
}

impl<C: PayloadCoder> TobBuilder<C> {
    /// Build the payload for `target_block`.
    ///
    /// Unreadable bids are excluded with a warning, or abort the build when
    /// strict. If the build does not seal, the block returns to open.
    #[instrument(skip(self, block_args))]
    pub fn build(
        &self,
        target_block: u64,
        block_args: &BlockArgs,
    ) -> Result<BuildOutcome, BuildError> {
        let bids = match self.ledger.begin_build(target_block)? {
            BuildTicket::Fresh(bids) => bids,
            BuildTicket::Sealed(result) => {
                debug!(bid_id = %result.bid_id(), "block already sealed");
                return Ok(BuildOutcome::AlreadySealed(result));
            }
        };
        let guard = BuildGuard::new(&self.ledger, target_block);

        let mut excluded = Vec::new();
        let mut revealed = Vec::with_capacity(bids.len());
        for bid in bids {
            match self.gate.reveal(&bid, &self.identity) {
                Ok(bundle) => revealed.push((bid, bundle)),
                Err(source) if self.strict => {
                    return Err(BuildError::Unreadable { bid_id: bid.id(), source });
                }
                Err(err) => {
                    warn!(bid_id = %bid.id(), %err, "excluding unreadable bundle");
                    excluded.push(bid.id());
                }
            }
        }

        revealed.sort_by(|(a, _), (b, _)| auction_order(a, b));

        if let Some(max) = self.max_bundles {
            let cap = max.get().min(revealed.len());
            for (bid, _) in revealed.drain(cap..) {
                warn!(bid_id = %bid.id(), max = max.get(), "excluding bundle over cap");
                excluded.push(bid.id());
            }
        }

        if revealed.is_empty() {
            debug!(excluded = excluded.len(), "no eligible bids");
            return Ok(BuildOutcome::NoEligibleBids { target_block, excluded });
        }

        let mut payload = TobPayload::new(target_block, block_args.clone());
        revealed.iter().for_each(|(bid, bundle)| payload.ingest(bid, bundle));

        let encoded = self
            .coder
            .encode(&payload)
            .map_err(|e| BuildError::Encoding { target_block, source: Box::new(e) })?;

        let bid_id = self.ledger.issue_id(target_block)?;
        let included = revealed.iter().map(|(bid, _)| bid.id()).collect();
        let result = Arc::new(BuildResult::new(bid_id, target_block, encoded, included, excluded));
        guard.seal(result.clone())?;

        info!(
            %bid_id,
            bundles = result.included().len(),
            excluded = result.excluded().len(),
            transactions = payload.tx_count(),
            "sealed block"
        );
        Ok(BuildOutcome::Sealed(result))
    }
}
