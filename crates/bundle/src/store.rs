use crate::{Access, AccessPolicy, ConfidentialBundle, StoreError};
use alloy::primitives::{Address, Bytes};
use core::fmt;
use dashmap::{mapref::entry::Entry, DashMap};
use pepc_types::{BidId, BundleRef};
use std::sync::Arc;
use tracing::{debug, trace};

/// A bundle held by the store: the submitted bytes, their decoded form, and
/// the policy it was submitted under.
#[derive(Debug, Clone)]
struct StoredBundle {
    raw: Bytes,
    bundle: Arc<ConfidentialBundle>,
    reference: BundleRef,
    policy: Arc<AccessPolicy>,
}

/// Holds submitted bundles keyed by bid id.
///
/// Every write is checked against the bid's sender allow-list and every read
/// against its peeker allow-list. There is no unchecked accessor for bundle
/// plaintext.
#[derive(Clone, Default)]
pub struct BundleStore {
    inner: Arc<DashMap<BidId, StoredBundle>>,
}

impl fmt::Debug for BundleStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BundleStore").field("bundles", &self.inner.len()).finish()
    }
}

impl BundleStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a bundle under `bid_id` on behalf of `caller`.
    ///
    /// `raw` is the exact byte string the caller submitted and `bundle` its
    /// decoded form. The stored [`BundleRef`] commits to `raw`.
    ///
    /// Fails with [`StoreError::Unauthorized`] if the caller is not admitted
    /// by the policy's sender list, and with [`StoreError::DuplicateRecord`]
    /// if the id is already in use.
    pub fn put(
        &self,
        bid_id: BidId,
        caller: Address,
        raw: Bytes,
        bundle: ConfidentialBundle,
        policy: Arc<AccessPolicy>,
    ) -> Result<(), StoreError> {
        if !policy.allows_sender(&caller) {
            return Err(StoreError::Unauthorized {
                bid_id,
                identity: caller,
                access: Access::Submit,
            });
        }

        match self.inner.entry(bid_id) {
            Entry::Occupied(_) => Err(StoreError::DuplicateRecord(bid_id)),
            Entry::Vacant(entry) => {
                let reference = BundleRef::commit(&raw);
                trace!(%bid_id, %reference, txs = bundle.len(), "storing bundle");
                entry.insert(StoredBundle { raw, bundle: Arc::new(bundle), reference, policy });
                Ok(())
            }
        }
    }

    /// Run `f` on a stored bundle if `requester` is on its peeker list.
    fn peek<T>(
        &self,
        bid_id: &BidId,
        requester: &Address,
        f: impl FnOnce(&StoredBundle) -> T,
    ) -> Result<T, StoreError> {
        let stored = self.inner.get(bid_id).ok_or(StoreError::NotFound(*bid_id))?;
        if !stored.policy.allows_peeker(requester) {
            debug!(%bid_id, %requester, "peek denied");
            return Err(StoreError::Unauthorized {
                bid_id: *bid_id,
                identity: *requester,
                access: Access::Peek,
            });
        }
        Ok(f(&stored))
    }

    /// Read a bundle's decoded plaintext on behalf of `requester`.
    ///
    /// Fails with [`StoreError::Unauthorized`] unless the requester is on the
    /// bid's peeker allow-list.
    pub fn get(
        &self,
        bid_id: &BidId,
        requester: &Address,
    ) -> Result<Arc<ConfidentialBundle>, StoreError> {
        self.peek(bid_id, requester, |stored| stored.bundle.clone())
    }

    /// Read the exact bytes that were submitted, on behalf of `requester`.
    ///
    /// Their keccak256 equals the bid's [`BundleRef`]. Same access rule as
    /// [`BundleStore::get`].
    pub fn get_raw(&self, bid_id: &BidId, requester: &Address) -> Result<Bytes, StoreError> {
        self.peek(bid_id, requester, |stored| stored.raw.clone())
    }

    /// Get the public reference of a stored bundle.
    pub fn reference(&self, bid_id: &BidId) -> Option<BundleRef> {
        self.inner.get(bid_id).map(|stored| stored.reference)
    }

    /// True if a bundle is stored under the id.
    pub fn contains(&self, bid_id: &BidId) -> bool {
        self.inner.contains_key(bid_id)
    }

    /// Drop the bundles for the given bids. Returns the number removed.
    pub fn remove_all<'a>(&self, bid_ids: impl IntoIterator<Item = &'a BidId>) -> usize {
        bid_ids.into_iter().filter(|id| self.inner.remove(*id).is_some()).count()
    }

    /// Get the number of stored bundles.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// True if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
