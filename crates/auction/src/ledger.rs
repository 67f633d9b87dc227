use crate::{BuildResult, LedgerError};
use alloy::primitives::U256;
use core::fmt;
use parking_lot::RwLock;
use pepc_bundle::AccessPolicy;
use pepc_types::{BidId, BundleRef};
use std::{
    collections::{hash_map::Entry, BTreeMap, HashMap},
    sync::Arc,
};
use tracing::{debug, error, trace};

/// A priced claim that a bundle should be included in a specific block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bid {
    id: BidId,
    target_block: u64,
    volume: U256,
    refund_percent: Option<u8>,
    policy: Arc<AccessPolicy>,
    reference: BundleRef,
}

impl Bid {
    /// The bid id.
    pub const fn id(&self) -> BidId {
        self.id
    }

    /// The block the bid targets.
    pub const fn target_block(&self) -> u64 {
        self.target_block
    }

    /// The bid value.
    pub const fn volume(&self) -> U256 {
        self.volume
    }

    /// The refund percent carried with the bid.
    pub const fn refund_percent(&self) -> Option<u8> {
        self.refund_percent
    }

    /// The sender and peeker allow-lists.
    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Reference to the bundle in the store.
    pub const fn reference(&self) -> BundleRef {
        self.reference
    }
}

/// The inputs to [`BidLedger::register`].
#[derive(Debug, Clone)]
pub struct BidRegistration {
    /// Reference to the bundle being bid for.
    pub reference: BundleRef,
    /// The block the bid targets.
    pub target_block: u64,
    /// The bid value.
    pub volume: U256,
    /// Refund percent carried as metadata.
    pub refund_percent: Option<u8>,
    /// Allow-lists for the bid.
    pub policy: Arc<AccessPolicy>,
}

/// The lifecycle of a single target block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BlockPhase {
    /// Accepting bids.
    #[default]
    Open,
    /// The builder is composing a payload. No bids are accepted.
    Building,
    /// The payload has been sealed. No bids are accepted and later builds
    /// return this result.
    Sealed(Arc<BuildResult>),
}

impl BlockPhase {
    /// True if the block accepts bids.
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    /// True if the block has been sealed.
    pub const fn is_sealed(&self) -> bool {
        matches!(self, Self::Sealed(_))
    }
}

/// The outcome of [`BidLedger::begin_build`].
#[derive(Debug, Clone)]
pub enum BuildTicket {
    /// The block moved from open to building. Contains the eligible bids in
    /// ledger order.
    Fresh(Vec<Bid>),
    /// The block was already sealed.
    Sealed(Arc<BuildResult>),
}

#[derive(Debug, Default)]
struct LedgerInner {
    /// Live bids, per target block, in insertion order.
    bids: BTreeMap<u64, Vec<Bid>>,
    /// Target block of each live bid.
    targets: HashMap<BidId, u64>,
    /// Ids issued for live blocks, with the block each was issued for.
    issued: HashMap<BidId, u64>,
    /// Phases of blocks that have left `Open`.
    phases: BTreeMap<u64, BlockPhase>,
    /// Blocks below this number have been pruned.
    expired_below: u64,
}

impl LedgerInner {
    fn check_live(&self, target_block: u64) -> Result<(), LedgerError> {
        if target_block < self.expired_below {
            return Err(LedgerError::BlockExpired { target_block, oldest_live: self.expired_below });
        }
        Ok(())
    }

    fn check_open(&self, target_block: u64) -> Result<(), LedgerError> {
        self.check_live(target_block)?;
        match self.phases.get(&target_block) {
            None | Some(BlockPhase::Open) => Ok(()),
            Some(BlockPhase::Building) => Err(LedgerError::BlockBuilding(target_block)),
            Some(BlockPhase::Sealed(_)) => Err(LedgerError::BlockSealed(target_block)),
        }
    }

    fn issue(&mut self, id: BidId, target_block: u64) -> Result<BidId, LedgerError> {
        match self.issued.entry(id) {
            Entry::Occupied(_) => {
                error!(%id, "bid id issued twice");
                Err(LedgerError::DuplicateBidId(id))
            }
            Entry::Vacant(entry) => {
                entry.insert(target_block);
                Ok(id)
            }
        }
    }
}

type IdSource = Box<dyn Fn() -> BidId + Send + Sync>;

/// Records bids per target block and owns the block phase state machine.
///
/// All mutations happen under a single write lock, so id issuance, bid
/// append and phase transitions are atomic with respect to one another. A
/// bid registered concurrently with [`Self::begin_build`] for the same block
/// either lands before the transition and is built, or is rejected.
pub struct BidLedger {
    inner: RwLock<LedgerInner>,
    id_source: IdSource,
}

impl fmt::Debug for BidLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("BidLedger")
            .field("live_bids", &inner.targets.len())
            .field("issued", &inner.issued.len())
            .field("expired_below", &inner.expired_below)
            .finish_non_exhaustive()
    }
}

impl Default for BidLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl BidLedger {
    /// Create a ledger issuing random ids.
    pub fn new() -> Self {
        Self::with_id_source(BidId::random)
    }

    /// Create a ledger with a custom id source.
    pub fn with_id_source(source: impl Fn() -> BidId + Send + Sync + 'static) -> Self {
        Self { inner: RwLock::new(LedgerInner::default()), id_source: Box::new(source) }
    }

    /// Issue a fresh id not tied to any bid, e.g. for a composite build of
    /// `target_block`. The id is forgotten when the block is pruned.
    pub fn issue_id(&self, target_block: u64) -> Result<BidId, LedgerError> {
        self.inner.write().issue((self.id_source)(), target_block)
    }

    /// Register a bid and return its fresh id.
    pub fn register(&self, registration: BidRegistration) -> Result<BidId, LedgerError> {
        self.register_with(registration, |_| Ok(()))
    }

    /// Register a backrun bid. Backruns carry a zero refund percent.
    pub fn register_backrun(
        &self,
        reference: BundleRef,
        target_block: u64,
        volume: U256,
        policy: Arc<AccessPolicy>,
    ) -> Result<BidId, LedgerError> {
        self.register(BidRegistration {
            reference,
            target_block,
            volume,
            refund_percent: Some(0),
            policy,
        })
    }

    /// Register a bid, running `commit` before the bid becomes visible.
    ///
    /// `commit` runs under the ledger's write lock. If it fails, the bid is
    /// not appended (its id stays burned) and the error is returned. This is
    /// how a bid and its stored bundle become visible together.
    pub fn register_with<F, E>(&self, registration: BidRegistration, commit: F) -> Result<BidId, E>
    where
        F: FnOnce(&Bid) -> Result<(), E>,
        E: From<LedgerError>,
    {
        let BidRegistration { reference, target_block, volume, refund_percent, policy } =
            registration;

        let mut inner = self.inner.write();
        inner.check_open(target_block)?;
        let id = inner.issue((self.id_source)(), target_block)?;

        let bid = Bid { id, target_block, volume, refund_percent, policy, reference };
        commit(&bid)?;

        trace!(%id, target_block, %volume, "registered bid");
        inner.targets.insert(id, target_block);
        inner.bids.entry(target_block).or_default().push(bid);
        Ok(id)
    }

    /// Ids of all live bids targeting `target_block`, in insertion order.
    pub fn list_eligible(&self, target_block: u64) -> Vec<BidId> {
        self.inner
            .read()
            .bids
            .get(&target_block)
            .map(|bids| bids.iter().map(Bid::id).collect())
            .unwrap_or_default()
    }

    /// All live bids targeting `target_block`, in insertion order.
    pub fn bids_for(&self, target_block: u64) -> Vec<Bid> {
        self.inner.read().bids.get(&target_block).cloned().unwrap_or_default()
    }

    /// Look up a live bid.
    pub fn bid(&self, id: &BidId) -> Option<Bid> {
        let inner = self.inner.read();
        let target = inner.targets.get(id)?;
        inner.bids.get(target)?.iter().find(|bid| bid.id == *id).cloned()
    }

    /// Current phase of a block.
    pub fn phase(&self, target_block: u64) -> BlockPhase {
        self.inner.read().phases.get(&target_block).cloned().unwrap_or_default()
    }

    /// Move `target_block` from open to building.
    ///
    /// Returns the eligible bids, or the prior result if the block is already
    /// sealed. Fails if a build is already in flight or the block expired.
    pub fn begin_build(&self, target_block: u64) -> Result<BuildTicket, LedgerError> {
        let mut inner = self.inner.write();
        inner.check_live(target_block)?;

        match inner.phases.get(&target_block) {
            Some(BlockPhase::Building) => return Err(LedgerError::BlockBuilding(target_block)),
            Some(BlockPhase::Sealed(result)) => return Ok(BuildTicket::Sealed(result.clone())),
            None | Some(BlockPhase::Open) => {}
        }

        inner.phases.insert(target_block, BlockPhase::Building);
        let bids = inner.bids.get(&target_block).cloned().unwrap_or_default();
        debug!(target_block, bids = bids.len(), "block building");
        Ok(BuildTicket::Fresh(bids))
    }

    /// Move `target_block` from building to sealed.
    pub fn seal(&self, target_block: u64, result: Arc<BuildResult>) -> Result<(), LedgerError> {
        let mut inner = self.inner.write();
        let Some(phase) = inner.phases.get_mut(&target_block) else {
            return Err(LedgerError::NotBuilding(target_block));
        };
        if !matches!(phase, BlockPhase::Building) {
            return Err(LedgerError::NotBuilding(target_block));
        }
        *phase = BlockPhase::Sealed(result);
        debug!(target_block, "block sealed");
        Ok(())
    }

    /// Move `target_block` from building back to open. No-op in any other
    /// phase.
    pub fn reopen(&self, target_block: u64) {
        let mut inner = self.inner.write();
        if matches!(inner.phases.get(&target_block), Some(BlockPhase::Building)) {
            inner.phases.remove(&target_block);
            debug!(target_block, "block reopened");
        }
    }

    /// Expire every block below `below`. Returns the ids of the dropped bids.
    ///
    /// Ids issued for expired blocks are forgotten, so the ledger only tracks
    /// ids for live blocks. Uniqueness against expired ids rests on the id
    /// source: the default draws 122 random bits per id.
    pub fn prune(&self, below: u64) -> Vec<BidId> {
        let mut inner = self.inner.write();
        if below <= inner.expired_below {
            return Vec::new();
        }

        let live = inner.bids.split_off(&below);
        let expired = std::mem::replace(&mut inner.bids, live);
        inner.phases = inner.phases.split_off(&below);
        inner.issued.retain(|_, target_block| *target_block >= below);
        inner.expired_below = below;

        let dropped: Vec<BidId> = expired.into_values().flatten().map(|bid| bid.id).collect();
        for id in &dropped {
            inner.targets.remove(id);
        }
        debug!(below, dropped = dropped.len(), "pruned ledger");
        dropped
    }

    /// Number of live bids.
    pub fn len(&self) -> usize {
        self.inner.read().targets.len()
    }

    /// True if there are no live bids.
    pub fn is_empty(&self) -> bool {
        self.inner.read().targets.is_empty()
    }
}
