//! End-to-end tests for the auction.
//!
//! - Bundles land in the payload in volume order.
//! - Plaintext is only released to peekers.
//! - Sealed blocks accept no bids and are built once.

use alloy::primitives::{Address, Bytes, U256};
use pepc_auction::{
    AbiCoder, Auction, AuctionError, AuctionEvent, BuildOutcome, LedgerError, Submission,
};
use pepc_relay::NoopRelay;
use pepc_test_utils::{
    init_tracing,
    relay::{FailingRelay, RecordingRelay},
    specs::{bundle_bytes, private_submission, simple_block_args, simple_bundle},
    users::{TEST_BUILDER, TEST_SIGNERS, TEST_USERS},
};
use pepc_types::{config::AuctionConfig, BundleRef};
use serde_json::json;

const RECIPIENT: Address = Address::repeat_byte(0x31);

fn config() -> AuctionConfig {
    AuctionConfig::new(TEST_BUILDER)
}

#[tokio::test]
async fn higher_volume_lands_first() {
    init_tracing();
    let relay = RecordingRelay::new();
    let auction = Auction::new(&config(), relay.clone());

    let x_bundle = simple_bundle(&TEST_SIGNERS[0], RECIPIENT, 2);
    let y_bundle = simple_bundle(&TEST_SIGNERS[1], RECIPIENT, 1);

    // Y arrives first, with the lower bid.
    let y = auction
        .submit_bundle(TEST_USERS[1], private_submission(TEST_USERS[1], 2, 100, &y_bundle))
        .unwrap();
    let x = auction
        .submit_bundle(TEST_USERS[0], private_submission(TEST_USERS[0], 2, 200, &x_bundle))
        .unwrap();

    let report = auction.build(2, &simple_block_args(2)).await.unwrap();
    assert!(report.delivered());

    let result = report.outcome.result().unwrap();
    assert_eq!(result.included(), &[x.bid_id(), y.bid_id()]);
    assert!(result.excluded().is_empty());

    let payloads = relay.payloads();
    assert_eq!(payloads.len(), 1);
    assert_eq!(&payloads[0], result.payload());

    let payload: serde_json::Value = serde_json::from_slice(&payloads[0]).unwrap();
    assert_eq!(payload["targetBlock"], 2);
    assert_eq!(payload["blockArgs"]["gasLimit"], 30_000_000);
    assert_eq!(payload["bundles"][0]["txs"], json!(x_bundle.txs));
    assert_eq!(payload["bundles"][1]["txs"], json!(y_bundle.txs));
}

#[tokio::test]
async fn events_carry_id_and_bytes() {
    let auction = Auction::new(&config(), NoopRelay);
    let mut events = auction.subscribe();

    let bundle = simple_bundle(&TEST_SIGNERS[2], RECIPIENT, 1);
    let submitted = auction
        .submit_bundle(TEST_USERS[2], private_submission(TEST_USERS[2], 5, 1, &bundle))
        .unwrap();
    let report = auction.build(5, &simple_block_args(5)).await.unwrap();
    let result = report.outcome.result().unwrap();

    let AuctionEvent::BundleSubmitted(first) = events.recv().await.unwrap() else {
        panic!("expected a submission event")
    };
    assert_eq!(first.bid_id(), submitted.bid_id());
    assert_eq!(first.bundle().as_ref(), BundleRef::commit(&bundle_bytes(&bundle)).as_slice());

    let AuctionEvent::BlockBuilt(second) = events.recv().await.unwrap() else {
        panic!("expected a build event")
    };
    assert_eq!(second.bid_id(), result.bid_id());
    assert_ne!(second.bid_id(), submitted.bid_id());
    assert_eq!(second.data(), result.payload());
}

#[test]
fn outsiders_cannot_peek() {
    let auction = Auction::new(&config(), NoopRelay);
    let bundle = simple_bundle(&TEST_SIGNERS[0], RECIPIENT, 1);

    for volume in [0, 1, 1_000_000] {
        let event = auction
            .submit_bundle(TEST_USERS[0], private_submission(TEST_USERS[0], 9, volume, &bundle))
            .unwrap();

        let err = auction.bundle(&event.bid_id(), &TEST_USERS[1]).unwrap_err();
        assert!(err.is_unauthorized());

        let own = auction.bundle(&event.bid_id(), &TEST_USERS[0]).unwrap();
        assert_eq!(*own, bundle);
        let builder = auction.bundle(&event.bid_id(), &TEST_BUILDER).unwrap();
        assert_eq!(bundle_bytes(&builder), bundle_bytes(&bundle));
    }
}

#[test]
fn reformatted_bundle_reads_back_verbatim() {
    let auction = Auction::new(&config(), NoopRelay);
    let bundle = simple_bundle(&TEST_SIGNERS[1], RECIPIENT, 2);
    let pretty: Bytes = serde_json::to_vec_pretty(&bundle).unwrap().into();
    assert_ne!(pretty, bundle_bytes(&bundle));

    let submission = Submission::new(4, U256::from(3), pretty.clone())
        .with_senders([TEST_USERS[1]])
        .with_peekers([TEST_USERS[1], TEST_BUILDER]);
    let event = auction.submit_bundle(TEST_USERS[1], submission).unwrap();

    let raw = auction.bundle_bytes(&event.bid_id(), &TEST_BUILDER).unwrap();
    assert_eq!(raw, pretty);
    assert_eq!(BundleRef::commit(&raw).as_slice(), event.bundle().as_ref());
    assert_eq!(*auction.bundle(&event.bid_id(), &TEST_BUILDER).unwrap(), bundle);

    let err = auction.bundle_bytes(&event.bid_id(), &TEST_USERS[2]).unwrap_err();
    assert!(err.is_unauthorized());
}

#[test]
fn empty_sender_list_admits_anyone() {
    let auction = Auction::new(&config(), NoopRelay);
    let bundle = simple_bundle(&TEST_SIGNERS[3], RECIPIENT, 1);
    let submission =
        Submission::new(1, U256::from(5), bundle_bytes(&bundle)).with_peekers([TEST_BUILDER]);

    auction.submit_bundle(Address::repeat_byte(0x99), submission).unwrap();
    assert_eq!(auction.list_eligible(1).len(), 1);
}

#[tokio::test]
async fn bundles_hidden_from_builder_are_reported() {
    let auction = Auction::new(&config(), NoopRelay);
    let visible = simple_bundle(&TEST_SIGNERS[0], RECIPIENT, 1);
    let hidden = simple_bundle(&TEST_SIGNERS[1], RECIPIENT, 1);

    let seen = auction
        .submit_bundle(TEST_USERS[0], private_submission(TEST_USERS[0], 4, 1, &visible))
        .unwrap();
    let unseen = auction
        .submit_bundle(
            TEST_USERS[1],
            Submission::new(4, U256::from(1_000), bundle_bytes(&hidden))
                .with_senders([TEST_USERS[1]])
                .with_peekers([TEST_USERS[1]]),
        )
        .unwrap();

    let report = auction.build(4, &simple_block_args(4)).await.unwrap();
    let result = report.outcome.result().unwrap();
    assert_eq!(result.included(), &[seen.bid_id()]);
    assert_eq!(result.excluded(), &[unseen.bid_id()]);
}

#[tokio::test]
async fn strict_build_refuses_hidden_bundles() {
    let auction = Auction::new(&config().with_strict_build(true), NoopRelay);
    let hidden = simple_bundle(&TEST_SIGNERS[1], RECIPIENT, 1);
    auction
        .submit_bundle(
            TEST_USERS[1],
            Submission::new(4, U256::from(1), bundle_bytes(&hidden)).with_peekers([TEST_USERS[1]]),
        )
        .unwrap();

    let err = auction.build(4, &simple_block_args(4)).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(auction.ledger().phase(4).is_open());
}

#[tokio::test]
async fn empty_block_is_not_built() {
    let relay = RecordingRelay::new();
    let auction = Auction::new(&config(), relay.clone());

    let report = auction.build(7, &simple_block_args(7)).await.unwrap();
    assert!(report.outcome.is_no_eligible_bids());
    assert!(report.relay_error.is_none());
    assert!(relay.is_empty());
}

#[tokio::test]
async fn sealed_block_rejects_late_bids() {
    let relay = RecordingRelay::new();
    let auction = Auction::new(&config(), relay.clone());
    let bundle = simple_bundle(&TEST_SIGNERS[0], RECIPIENT, 1);

    auction
        .submit_bundle(TEST_USERS[0], private_submission(TEST_USERS[0], 3, 10, &bundle))
        .unwrap();
    let first = auction.build(3, &simple_block_args(3)).await.unwrap();

    let late = simple_bundle(&TEST_SIGNERS[1], RECIPIENT, 1);
    let err = auction
        .submit_bundle(TEST_USERS[1], private_submission(TEST_USERS[1], 3, 1_000, &late))
        .unwrap_err();
    assert!(matches!(err, AuctionError::Ledger(LedgerError::BlockSealed(3))));

    let second = auction.build(3, &simple_block_args(3)).await.unwrap();
    let BuildOutcome::AlreadySealed(prior) = &second.outcome else {
        panic!("expected the prior result")
    };
    assert_eq!(Some(prior), first.outcome.result());
    assert_eq!(relay.len(), 1);
}

#[tokio::test]
async fn relay_failure_does_not_unseal() {
    let auction = Auction::new(&config(), FailingRelay);
    let bundle = simple_bundle(&TEST_SIGNERS[0], RECIPIENT, 1);
    auction
        .submit_bundle(TEST_USERS[0], private_submission(TEST_USERS[0], 6, 10, &bundle))
        .unwrap();

    let report = auction.build(6, &simple_block_args(6)).await.unwrap();
    assert!(report.outcome.is_fresh());
    assert!(report.relay_error.is_some());
    assert!(!report.delivered());
    assert!(auction.ledger().phase(6).is_sealed());
}

#[tokio::test]
async fn abi_payloads_are_delivered() {
    let relay = RecordingRelay::new();
    let auction = Auction::new(&config(), relay.clone()).with_coder(AbiCoder);
    let bundle = simple_bundle(&TEST_SIGNERS[0], RECIPIENT, 1);
    auction
        .submit_bundle(TEST_USERS[0], private_submission(TEST_USERS[0], 8, 10, &bundle))
        .unwrap();

    let report = auction.build(8, &simple_block_args(8)).await.unwrap();
    assert!(report.delivered());
    // Head of the tuple is the target block.
    assert_eq!(relay.payloads()[0][..32], U256::from(8).to_be_bytes::<32>());
    assert_eq!(relay.content_types(), vec!["application/octet-stream"]);
}

#[test]
fn pruned_blocks_are_closed() {
    let auction = Auction::new(&config(), NoopRelay);
    let bundle = simple_bundle(&TEST_SIGNERS[0], RECIPIENT, 1);
    auction
        .submit_bundle(TEST_USERS[0], private_submission(TEST_USERS[0], 1, 10, &bundle))
        .unwrap();

    assert_eq!(auction.prune(2), 1);
    assert!(auction.store().is_empty());

    let err = auction
        .submit_bundle(TEST_USERS[0], private_submission(TEST_USERS[0], 1, 10, &bundle))
        .unwrap_err();
    assert!(matches!(err, AuctionError::Ledger(LedgerError::BlockExpired { .. })));
}
