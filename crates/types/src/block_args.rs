use crate::{BuildBlockArgs, SolWithdrawal};
use alloy::primitives::{Address, Bytes, B256};
use serde::{Deserialize, Serialize};

/// A validator withdrawal to be processed in the built block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Withdrawal {
    /// Monotonic withdrawal index.
    pub index: u64,
    /// Index of the validator being withdrawn from.
    pub validator: u64,
    /// Withdrawal recipient.
    pub address: Address,
    /// Amount, in gwei.
    pub amount: u64,
}

impl From<&Withdrawal> for SolWithdrawal {
    fn from(w: &Withdrawal) -> Self {
        Self { index: w.index, validator: w.validator, recipient: w.address, amount: w.amount }
    }
}

/// Arguments describing the block a top-of-block payload is built for.
///
/// These are constructed fresh for each build request and are not persisted
/// beyond it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockArgs {
    /// Beacon slot of the block.
    pub slot: u64,
    /// Public key of the proposer for the slot.
    pub proposer_pubkey: Bytes,
    /// Parent block hash.
    pub parent: B256,
    /// Block timestamp.
    pub timestamp: u64,
    /// Fee recipient of the block.
    pub fee_recipient: Address,
    /// Block gas limit.
    pub gas_limit: u64,
    /// `prevRandao` value for the block.
    pub random: B256,
    /// Withdrawals to process, in order.
    #[serde(default)]
    pub withdrawals: Vec<Withdrawal>,
}

impl BlockArgs {
    /// Get the number of withdrawals.
    pub fn withdrawal_count(&self) -> usize {
        self.withdrawals.len()
    }
}

impl From<&BlockArgs> for BuildBlockArgs {
    fn from(args: &BlockArgs) -> Self {
        Self {
            slot: args.slot,
            proposerPubkey: args.proposer_pubkey.clone(),
            parent: args.parent,
            timestamp: args.timestamp,
            feeRecipient: args.fee_recipient,
            gasLimit: args.gas_limit,
            random: args.random,
            withdrawals: args.withdrawals.iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use alloy::primitives::{address, b256};

    #[test]
    fn deser_camel_case() {
        let json = r#"{
            "slot": 1,
            "proposerPubkey": "0x1234",
            "parent": "0x524529737b6448c3803001db5ea2758d93da27520f794f65f69b92ad6934ef38",
            "timestamp": 1700000000,
            "feeRecipient": "0x0000000000000000000000000000000000000001",
            "gasLimit": 1000000,
            "random": "0x0000000000000000000000000000000000000000000000000000000000001234",
            "withdrawals": [{"index": 0, "validator": 5, "address": "0x0000000000000000000000000000000000000002", "amount": 32}]
        }"#;

        let args: BlockArgs = serde_json::from_str(json).unwrap();
        assert_eq!(args.slot, 1);
        assert_eq!(
            args.parent,
            b256!("524529737b6448c3803001db5ea2758d93da27520f794f65f69b92ad6934ef38")
        );
        assert_eq!(args.fee_recipient, address!("0000000000000000000000000000000000000001"));
        assert_eq!(args.gas_limit, 1_000_000);
        assert_eq!(args.withdrawals[0].validator, 5);

        let sol: BuildBlockArgs = (&args).into();
        assert_eq!(sol.withdrawals.len(), 1);
        assert_eq!(sol.withdrawals[0].recipient, args.withdrawals[0].address);
    }

    #[test]
    fn withdrawals_default_to_empty() {
        let json = r#"{
            "slot": 2,
            "proposerPubkey": "0x",
            "parent": "0x0000000000000000000000000000000000000000000000000000000000000000",
            "timestamp": 0,
            "feeRecipient": "0x0000000000000000000000000000000000000000",
            "gasLimit": 30000000,
            "random": "0x0000000000000000000000000000000000000000000000000000000000000000"
        }"#;

        let args: BlockArgs = serde_json::from_str(json).unwrap();
        assert_eq!(args.withdrawal_count(), 0);
    }
}
