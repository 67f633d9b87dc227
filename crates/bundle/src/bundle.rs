//! Confidential bundle type.
use crate::BundleError;
use alloy::{
    consensus::{
        transaction::{Recovered, SignerRecoverable},
        TxEnvelope,
    },
    eips::{eip2718::Eip2718Result, Decodable2718},
    primitives::{Bytes, TxHash, B256},
};
use serde::{Deserialize, Serialize};

/// A bundle of transactions submitted to the auction.
///
/// The wire form is the JSON document produced by the submitting client:
///
/// ```json
/// {"txs": ["0x..."], "revertingHashes": ["0x..."], "refundPercent": 10}
/// ```
///
/// Each entry of `txs` is an EIP-2718 encoded, signed transaction. Bundles are
/// immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidentialBundle {
    /// The signed transactions, in execution order.
    pub txs: Vec<Bytes>,

    /// Hashes of transactions that may revert without invalidating the
    /// bundle.
    #[serde(default)]
    pub reverting_hashes: Vec<B256>,

    /// Share of the bundle's value refunded to the submitter. Carried as
    /// metadata only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refund_percent: Option<u8>,
}

impl ConfidentialBundle {
    /// Creates a new bundle. This does not validate the transactions, see
    /// [`Self::validate`].
    pub const fn new(
        txs: Vec<Bytes>,
        reverting_hashes: Vec<B256>,
        refund_percent: Option<u8>,
    ) -> Self {
        Self { txs, reverting_hashes, refund_percent }
    }

    /// Parse the wire form and validate the result.
    pub fn decode(bytes: &[u8]) -> Result<Self, BundleError> {
        let bundle: Self = serde_json::from_slice(bytes)?;
        bundle.validate()?;
        Ok(bundle)
    }

    /// Serialize the bundle to its wire form.
    pub fn encode(&self) -> Result<Vec<u8>, BundleError> {
        serde_json::to_vec(self).map_err(Into::into)
    }

    /// Check the bundle is well-formed: non-empty, every transaction decodes
    /// and has a recoverable signer, and the refund percent is in range.
    pub fn validate(&self) -> Result<(), BundleError> {
        if self.txs.is_empty() {
            return Err(BundleError::EmptyBundle);
        }
        if let Some(percent) = self.refund_percent.filter(|p| *p > 100) {
            return Err(BundleError::RefundOutOfRange(percent));
        }
        self.recover_txs().try_for_each(|res| res.map(drop))
    }

    /// Returns the raw transactions in this bundle.
    #[allow(clippy::missing_const_for_fn)] // false positive, const deref
    pub fn txs(&self) -> &[Bytes] {
        &self.txs
    }

    /// Returns the number of transactions in this bundle.
    pub fn len(&self) -> usize {
        self.txs.len()
    }

    /// True if the bundle has no transactions.
    pub fn is_empty(&self) -> bool {
        self.txs.is_empty()
    }

    /// Returns the reverting tx hashes for this bundle.
    #[allow(clippy::missing_const_for_fn)]
    pub fn reverting_hashes(&self) -> &[B256] {
        &self.reverting_hashes
    }

    /// Returns the refund percent, if any.
    pub const fn refund_percent(&self) -> Option<u8> {
        self.refund_percent
    }

    /// True if the transaction with this hash may revert.
    pub fn may_revert(&self, hash: &TxHash) -> bool {
        self.reverting_hashes.contains(hash)
    }

    /// Return an iterator over decoded transactions in this bundle.
    pub fn decode_txs(&self) -> impl Iterator<Item = Eip2718Result<TxEnvelope>> + '_ {
        self.txs.iter().map(|tx| TxEnvelope::decode_2718(&mut &tx[..]))
    }

    /// Return an iterator over recovered transactions in this bundle. This
    /// iterator may include errors.
    pub fn recover_txs(
        &self,
    ) -> impl Iterator<Item = Result<Recovered<TxEnvelope>, BundleError>> + '_ {
        self.decode_txs().enumerate().map(|(index, res)| match res {
            Ok(tx) => {
                tx.try_into_recovered().map_err(|err| BundleError::transaction(err, index))
            }
            Err(err) => Err(BundleError::transaction(err, index)),
        })
    }

    /// Return the hashes of the decodable transactions in this bundle.
    pub fn tx_hashes(&self) -> impl Iterator<Item = TxHash> + '_ {
        self.decode_txs().flatten().map(|tx| *tx.tx_hash())
    }
}
