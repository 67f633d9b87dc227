use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The allow-lists attached to a bid.
///
/// An empty sender list admits any submitter. An empty peeker list admits no
/// reader: plaintext is only ever released to identities named explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessPolicy {
    allowed_senders: BTreeSet<Address>,
    allowed_peekers: BTreeSet<Address>,
}

impl AccessPolicy {
    /// Create a policy from sender and peeker allow-lists.
    pub fn new(
        senders: impl IntoIterator<Item = Address>,
        peekers: impl IntoIterator<Item = Address>,
    ) -> Self {
        Self {
            allowed_senders: senders.into_iter().collect(),
            allowed_peekers: peekers.into_iter().collect(),
        }
    }

    /// A policy where the same set of identities may submit and peek.
    pub fn symmetric(identities: impl IntoIterator<Item = Address>) -> Self {
        let set: BTreeSet<_> = identities.into_iter().collect();
        Self { allowed_senders: set.clone(), allowed_peekers: set }
    }

    /// True if `identity` may submit under this policy.
    pub fn allows_sender(&self, identity: &Address) -> bool {
        self.allowed_senders.is_empty() || self.allowed_senders.contains(identity)
    }

    /// True if `identity` may read bundle plaintext under this policy.
    pub fn allows_peeker(&self, identity: &Address) -> bool {
        self.allowed_peekers.contains(identity)
    }

    /// The sender allow-list.
    pub const fn senders(&self) -> &BTreeSet<Address> {
        &self.allowed_senders
    }

    /// The peeker allow-list.
    pub const fn peekers(&self) -> &BTreeSet<Address> {
        &self.allowed_peekers
    }
}
