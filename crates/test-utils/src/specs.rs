use crate::users::TEST_BUILDER;
use alloy::{
    consensus::{constants::GWEI_TO_WEI, SignableTransaction, TxEip1559, TxEnvelope},
    eips::eip2718::Encodable2718,
    primitives::{Address, Bytes, TxKind, B256, U256},
    signers::{local::PrivateKeySigner, SignerSync},
};
use pepc_auction::Submission;
use pepc_bundle::ConfidentialBundle;
use pepc_types::{BlockArgs, Withdrawal};

/// Chain id used for test transactions.
pub const TEST_CHAIN_ID: u64 = 17_001;

/// Make a wallet with a deterministic keypair.
pub fn make_wallet(i: u8) -> PrivateKeySigner {
    PrivateKeySigner::from_bytes(&B256::repeat_byte(i)).unwrap()
}

/// Make a simple send transaction.
pub fn simple_send(to: Address, amount: U256, nonce: u64) -> TxEip1559 {
    TxEip1559 {
        nonce,
        gas_limit: 21_000,
        to: TxKind::Call(to),
        value: amount,
        chain_id: TEST_CHAIN_ID,
        max_fee_per_gas: GWEI_TO_WEI as u128 * 100,
        max_priority_fee_per_gas: GWEI_TO_WEI as u128,
        ..Default::default()
    }
}

/// Sign a transaction with a wallet.
pub fn sign_tx_with_key_pair(wallet: &PrivateKeySigner, tx: TxEip1559) -> TxEnvelope {
    let signature = wallet.sign_hash_sync(&tx.signature_hash()).unwrap();
    tx.into_signed(signature).into()
}

/// Sign a simple send and return its EIP-2718 encoding.
pub fn encoded_send(wallet: &PrivateKeySigner, to: Address, amount: U256, nonce: u64) -> Bytes {
    sign_tx_with_key_pair(wallet, simple_send(to, amount, nonce)).encoded_2718().into()
}

/// Make a bundle of simple sends from `wallet`, one per nonce.
pub fn simple_bundle(wallet: &PrivateKeySigner, to: Address, count: u64) -> ConfidentialBundle {
    let txs = (0..count).map(|nonce| encoded_send(wallet, to, U256::from(1), nonce)).collect();
    ConfidentialBundle::new(txs, vec![], None)
}

/// Encode a bundle in its wire form.
pub fn bundle_bytes(bundle: &ConfidentialBundle) -> Bytes {
    bundle.encode().unwrap().into()
}

/// A submission only `owner` may submit, readable by `owner` and the test
/// builder.
pub fn private_submission(
    owner: Address,
    target_block: u64,
    volume: u64,
    bundle: &ConfidentialBundle,
) -> Submission {
    Submission::new(target_block, U256::from(volume), bundle_bytes(bundle))
        .with_senders([owner])
        .with_peekers([owner, TEST_BUILDER])
}

/// Block arguments for a block at `slot`.
pub fn simple_block_args(slot: u64) -> BlockArgs {
    BlockArgs {
        slot,
        proposer_pubkey: Bytes::from(vec![0xab; 48]),
        parent: B256::repeat_byte(0x01),
        timestamp: 1_700_000_000 + slot * 12,
        fee_recipient: Address::repeat_byte(0xfe),
        gas_limit: 30_000_000,
        random: B256::repeat_byte(0x02),
        withdrawals: vec![Withdrawal {
            index: slot,
            validator: 7,
            address: Address::repeat_byte(0x0a),
            amount: 32_000_000_000,
        }],
    }
}
