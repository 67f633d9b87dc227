use crate::{
    AuctionError, BidLedger, BidRegistration, BuildOutcome, ConfidentialityGate, JsonCoder,
    PayloadCoder, TobBuilder,
};
use alloy::primitives::{Address, Bytes, U256};
use core::fmt;
use pepc_bundle::{AccessPolicy, BundleStore, ConfidentialBundle};
use pepc_relay::{HttpRelay, NoopRelay, RelayError, RelaySink};
use pepc_types::{config::AuctionConfig, BidId, BlockArgs, BuildBlock, BundleRef, SendBundleTx};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

/// Capacity of the event channel. Slow subscribers observe a lag error.
const EVENT_CAPACITY: usize = 256;

/// A bundle submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// The block the bundle targets.
    pub target_block: u64,
    /// Identities that may submit under this bid. Empty admits anyone.
    pub allowed_senders: Vec<Address>,
    /// Identities that may read the bundle plaintext.
    pub allowed_peekers: Vec<Address>,
    /// The bid value.
    pub volume: U256,
    /// The bundle in its JSON wire form.
    pub bundle: Bytes,
}

impl Submission {
    /// Create a submission with empty allow-lists.
    pub const fn new(target_block: u64, volume: U256, bundle: Bytes) -> Self {
        Self {
            target_block,
            allowed_senders: Vec::new(),
            allowed_peekers: Vec::new(),
            volume,
            bundle,
        }
    }

    /// Set the sender allow-list.
    pub fn with_senders(mut self, senders: impl IntoIterator<Item = Address>) -> Self {
        self.allowed_senders = senders.into_iter().collect();
        self
    }

    /// Set the peeker allow-list.
    pub fn with_peekers(mut self, peekers: impl IntoIterator<Item = Address>) -> Self {
        self.allowed_peekers = peekers.into_iter().collect();
        self
    }
}

/// Events observable by external listeners.
#[derive(Debug, Clone)]
pub enum AuctionEvent {
    /// A bundle was accepted.
    BundleSubmitted(SendBundleTx),
    /// A block was sealed.
    BlockBuilt(BuildBlock),
}

/// The result of [`Auction::build`].
#[derive(Debug)]
pub struct BuildReport {
    /// What the builder did.
    pub outcome: BuildOutcome,
    /// Set if a freshly sealed payload could not be delivered. The block
    /// stays sealed.
    pub relay_error: Option<RelayError>,
}

impl BuildReport {
    /// True if the block was sealed by this call and delivered.
    pub const fn delivered(&self) -> bool {
        self.outcome.is_fresh() && self.relay_error.is_none()
    }
}

/// A sealed-bid bundle auction with a top-of-block builder.
///
/// Submissions are validated, committed to the store and registered in the
/// ledger in one step. Builds compose the readable bids for a block, seal
/// it, and push the payload to the relay.
pub struct Auction<R = NoopRelay, C = JsonCoder> {
    ledger: Arc<BidLedger>,
    store: BundleStore,
    builder: TobBuilder<C>,
    relay: R,
    events: broadcast::Sender<AuctionEvent>,
}

impl<R, C> fmt::Debug for Auction<R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auction")
            .field("ledger", &self.ledger)
            .field("store", &self.store)
            .field("identity", &self.builder.identity())
            .field("subscribers", &self.events.receiver_count())
            .finish_non_exhaustive()
    }
}

impl Auction<Box<dyn RelaySink>> {
    /// Create an auction from configuration. Pushes to an [`HttpRelay`] if a
    /// relay URL is configured, otherwise drops payloads.
    pub fn from_config(config: &AuctionConfig) -> Self {
        let relay: Box<dyn RelaySink> = match &config.relay_url {
            Some(url) => Box::new(HttpRelay::new(url.clone())),
            None => Box::new(NoopRelay),
        };
        Self::new(config, relay)
    }
}

impl<R: RelaySink> Auction<R> {
    /// Create an auction pushing to `relay`.
    pub fn new(config: &AuctionConfig, relay: R) -> Self {
        Self::with_ledger(config, relay, BidLedger::new())
    }

    /// Create an auction around an existing ledger.
    pub fn with_ledger(config: &AuctionConfig, relay: R, ledger: BidLedger) -> Self {
        let ledger = Arc::new(ledger);
        let store = BundleStore::new();
        let gate = ConfidentialityGate::new(store.clone());
        let builder = TobBuilder::new(ledger.clone(), gate, config);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { ledger, store, builder, relay, events }
    }
}

impl<R, C> Auction<R, C> {
    /// Replace the payload coder. The relay must accept the new encoding.
    pub fn with_coder<D: PayloadCoder>(self, coder: D) -> Auction<R, D> {
        Auction {
            ledger: self.ledger,
            store: self.store,
            builder: self.builder.with_coder(coder),
            relay: self.relay,
            events: self.events,
        }
    }

    /// Get the ledger.
    pub const fn ledger(&self) -> &Arc<BidLedger> {
        &self.ledger
    }

    /// Get the bundle store.
    pub const fn store(&self) -> &BundleStore {
        &self.store
    }

    /// Get the builder.
    pub const fn builder(&self) -> &TobBuilder<C> {
        &self.builder
    }

    /// Get the relay.
    pub const fn relay(&self) -> &R {
        &self.relay
    }

    /// Subscribe to auction events.
    pub fn subscribe(&self) -> broadcast::Receiver<AuctionEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: AuctionEvent) {
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }

    /// Submit a bundle on behalf of `caller`.
    ///
    /// The bundle is stored and the bid registered atomically: a concurrent
    /// build either sees both or neither.
    #[instrument(skip_all, fields(%caller, target_block = submission.target_block))]
    pub fn submit_bundle(
        &self,
        caller: Address,
        submission: Submission,
    ) -> Result<SendBundleTx, AuctionError> {
        let Submission { target_block, allowed_senders, allowed_peekers, volume, bundle } =
            submission;

        let policy = Arc::new(AccessPolicy::new(allowed_senders, allowed_peekers));
        if !policy.allows_sender(&caller) {
            return Err(AuctionError::Unauthorized(caller));
        }

        let decoded = ConfidentialBundle::decode(&bundle)?;
        let reference = BundleRef::commit(&bundle);
        let registration = BidRegistration {
            reference,
            target_block,
            volume,
            refund_percent: decoded.refund_percent(),
            policy: policy.clone(),
        };

        let bid_id = self.ledger.register_with(registration, |bid| {
            self.store.put(bid.id(), caller, bundle, decoded, policy).map_err(AuctionError::from)
        })?;

        info!(%bid_id, %volume, %reference, "bundle submitted");
        let event = SendBundleTx::for_bid(bid_id, reference);
        self.emit(AuctionEvent::BundleSubmitted(event.clone()));
        Ok(event)
    }

    /// Read a bundle's plaintext on behalf of `requester`.
    pub fn bundle(
        &self,
        bid_id: &BidId,
        requester: &Address,
    ) -> Result<Arc<ConfidentialBundle>, AuctionError> {
        self.store.get(bid_id, requester).map_err(Into::into)
    }

    /// Read the exact bytes a bundle was submitted as, on behalf of
    /// `requester`. Their keccak256 is the bid's [`BundleRef`].
    pub fn bundle_bytes(
        &self,
        bid_id: &BidId,
        requester: &Address,
    ) -> Result<Bytes, AuctionError> {
        self.store.get_raw(bid_id, requester).map_err(Into::into)
    }

    /// Ids of the live bids for a block, in submission order.
    pub fn list_eligible(&self, target_block: u64) -> Vec<BidId> {
        self.ledger.list_eligible(target_block)
    }

    /// Expire every block below `below`, dropping its bids and bundles.
    /// Returns the number of bundles removed.
    pub fn prune(&self, below: u64) -> usize {
        let dropped = self.ledger.prune(below);
        let removed = self.store.remove_all(&dropped);
        debug!(below, bids = dropped.len(), bundles = removed, "pruned auction");
        removed
    }
}

impl<R: RelaySink, C: PayloadCoder> Auction<R, C> {
    /// Build `target_block` and push a fresh payload to the relay.
    ///
    /// Relay failures are reported in the [`BuildReport`] and do not unseal
    /// the block. A block that was already sealed is not pushed again.
    #[instrument(skip(self, block_args))]
    pub async fn build(
        &self,
        target_block: u64,
        block_args: &BlockArgs,
    ) -> Result<BuildReport, AuctionError> {
        let outcome = self.builder.build(target_block, block_args)?;

        let relay_error = match &outcome {
            BuildOutcome::Sealed(result) => {
                self.emit(AuctionEvent::BlockBuilt(result.event()));
                self.relay
                    .push(result.payload().clone(), self.builder.coder().content_type())
                    .await
                    .inspect_err(|err| warn!(%err, "relay delivery failed"))
                    .err()
            }
            BuildOutcome::AlreadySealed(_) | BuildOutcome::NoEligibleBids { .. } => None,
        };

        Ok(BuildReport { outcome, relay_error })
    }
}
