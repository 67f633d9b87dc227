use crate::{TobBundle, TobPayload};
use alloy::{primitives::Bytes, sol_types::SolValue};
use core::convert::Infallible;

/// Encodes a [`TobPayload`] into the bytes handed to the relay.
pub trait PayloadCoder: Send + Sync {
    /// The error type for encoding.
    type Error: core::error::Error + Send + Sync + 'static;

    /// Encode the payload.
    fn encode(&self, payload: &TobPayload) -> Result<Bytes, Self::Error>;

    /// The MIME type of the encoded payload.
    fn content_type(&self) -> &'static str;
}

/// Encodes payloads as JSON. This is the form relays read by default.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCoder;

impl PayloadCoder for JsonCoder {
    type Error = serde_json::Error;

    fn encode(&self, payload: &TobPayload) -> Result<Bytes, Self::Error> {
        serde_json::to_vec(payload).map(Into::into)
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }
}

#[allow(unreachable_pub, missing_docs)]
mod abi {
    alloy::sol! {
        #[derive(Debug, PartialEq, Eq)]
        struct AbiTobBundle {
            bytes16 bidId;
            uint256 volume;
            bytes[] txs;
            bytes32[] revertingHashes;
            bool hasRefund;
            uint8 refundPercent;
        }
    }
}
use abi::AbiTobBundle;

impl From<&TobBundle> for AbiTobBundle {
    fn from(bundle: &TobBundle) -> Self {
        Self {
            bidId: bundle.bid_id.as_fixed(),
            volume: bundle.volume,
            txs: bundle.txs.clone(),
            revertingHashes: bundle.reverting_hashes.clone(),
            hasRefund: bundle.refund_percent.is_some(),
            refundPercent: bundle.refund_percent.unwrap_or_default(),
        }
    }
}

/// Encodes payloads as the Solidity ABI tuple
/// `(uint64 targetBlock, BuildBlockArgs args, AbiTobBundle[] bundles)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbiCoder;

impl PayloadCoder for AbiCoder {
    type Error = Infallible;

    fn encode(&self, payload: &TobPayload) -> Result<Bytes, Self::Error> {
        let args: pepc_types::BuildBlockArgs = payload.block_args().into();
        let bundles: Vec<AbiTobBundle> = payload.bundles().iter().map(Into::into).collect();
        Ok((payload.target_block(), args, bundles).abi_encode_params().into())
    }

    fn content_type(&self) -> &'static str {
        "application/octet-stream"
    }
}
