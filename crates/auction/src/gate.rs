use crate::Bid;
use alloy::primitives::Address;
use pepc_bundle::{Access, BundleStore, ConfidentialBundle, StoreError};
use std::sync::Arc;

/// Mediates every read of bundle plaintext.
///
/// A caller is authorized for a bid iff it is on the bid's peeker allow-list.
/// The check runs before any bytes leave the [`BundleStore`], and the store
/// repeats it against its own copy of the policy.
#[derive(Debug, Clone)]
pub struct ConfidentialityGate {
    store: BundleStore,
}

impl ConfidentialityGate {
    /// Create a gate in front of a store.
    pub const fn new(store: BundleStore) -> Self {
        Self { store }
    }

    /// Get the store behind the gate.
    pub const fn store(&self) -> &BundleStore {
        &self.store
    }

    /// True if `caller` may read the bundle behind `bid`.
    pub fn authorize(&self, bid: &Bid, caller: &Address) -> bool {
        bid.policy().allows_peeker(caller)
    }

    /// Read the bundle behind `bid` on behalf of `caller`.
    pub fn reveal(
        &self,
        bid: &Bid,
        caller: &Address,
    ) -> Result<Arc<ConfidentialBundle>, StoreError> {
        if !self.authorize(bid, caller) {
            return Err(StoreError::Unauthorized {
                bid_id: bid.id(),
                identity: *caller,
                access: Access::Peek,
            });
        }
        self.store.get(&bid.id(), caller)
    }
}
