//! Concurrency tests for submission and build.

use alloy::primitives::Address;
use pepc_auction::{Auction, AuctionError, BuildOutcome, LedgerError};
use pepc_test_utils::{
    relay::RecordingRelay,
    specs::{private_submission, simple_block_args, simple_bundle},
    users::{TEST_BUILDER, TEST_SIGNERS, TEST_USERS},
};
use pepc_types::{config::AuctionConfig, BidId};
use std::{collections::HashSet, sync::Arc};

const RECIPIENT: Address = Address::repeat_byte(0x42);
const TASKS: usize = 8;
const PER_TASK: u64 = 16;

fn auction() -> Arc<Auction<RecordingRelay>> {
    Arc::new(Auction::new(&AuctionConfig::new(TEST_BUILDER), RecordingRelay::new()))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submissions_get_distinct_ids() {
    let auction = auction();

    let handles: Vec<_> = (0..TASKS)
        .map(|t| {
            let auction = auction.clone();
            tokio::spawn(async move {
                let bundle = simple_bundle(&TEST_SIGNERS[t], RECIPIENT, 1);
                (0..PER_TASK)
                    .map(|i| {
                        auction
                            .submit_bundle(
                                TEST_USERS[t],
                                private_submission(TEST_USERS[t], t as u64 % 2, i, &bundle),
                            )
                            .unwrap()
                            .bid_id()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        for id in handle.await.unwrap() {
            assert!(ids.insert(id), "duplicate bid id {id}");
        }
    }
    assert_eq!(ids.len(), TASKS * PER_TASK as usize);

    let eligible: HashSet<_> =
        auction.list_eligible(0).into_iter().chain(auction.list_eligible(1)).collect();
    assert_eq!(eligible, ids);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn build_sees_whole_submissions_only() {
    let auction = auction();

    let submitters: Vec<_> = (0..TASKS)
        .map(|t| {
            let auction = auction.clone();
            tokio::spawn(async move {
                let bundle = simple_bundle(&TEST_SIGNERS[t], RECIPIENT, 1);
                let mut accepted = Vec::new();
                for i in 0..PER_TASK {
                    let submission = private_submission(TEST_USERS[t], 1, i, &bundle);
                    match auction.submit_bundle(TEST_USERS[t], submission) {
                        Ok(event) => accepted.push(event.bid_id()),
                        Err(AuctionError::Ledger(
                            LedgerError::BlockBuilding(1) | LedgerError::BlockSealed(1),
                        )) => {}
                        Err(err) => panic!("unexpected error: {err}"),
                    }
                    tokio::task::yield_now().await;
                }
                accepted
            })
        })
        .collect();

    let builder = {
        let auction = auction.clone();
        tokio::spawn(async move { auction.build(1, &simple_block_args(1)).await })
    };

    let report = builder.await.unwrap().unwrap();
    let mut accepted = HashSet::<BidId>::new();
    for handle in submitters {
        accepted.extend(handle.await.unwrap());
    }

    match report.outcome {
        BuildOutcome::Sealed(result) => {
            // Every accepted bid was in the build; none slipped in after.
            let included: HashSet<_> = result.included().iter().copied().collect();
            assert_eq!(included, accepted);
            assert!(result.excluded().is_empty());
        }
        BuildOutcome::NoEligibleBids { excluded, .. } => assert!(excluded.is_empty()),
        BuildOutcome::AlreadySealed(_) => panic!("block was built once"),
    }
}
