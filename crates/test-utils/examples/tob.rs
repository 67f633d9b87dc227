//! Runs a two-bundle auction against an in-process relay.
//!
//! ```sh
//! RUST_LOG=info cargo run -p pepc-test-utils --example tob
//! ```

use alloy::{
    primitives::{Address, U256},
    sol_types::SolEvent,
};
use axum::{http::StatusCode, routing::post, Router};
use pepc_auction::{Auction, Submission};
use pepc_bundle::ConfidentialBundle;
use pepc_test_utils::{
    init_tracing,
    specs::{bundle_bytes, encoded_send, simple_block_args},
    users::{TEST_BUILDER, TEST_SIGNERS, TEST_USERS},
};
use pepc_types::{config::AuctionConfig, SendBundleTx};
use tracing::info;

async fn spawn_relay() -> eyre::Result<url::Url> {
    let app = Router::new().route(
        "/",
        post(|body: String| async move {
            info!(len = body.len(), "relay received payload");
            StatusCode::OK
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move { axum::serve(listener, app).await });
    Ok(format!("http://{addr}/").parse()?)
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    init_tracing();

    let relay_url = spawn_relay().await?;
    let config = AuctionConfig::new(TEST_BUILDER).with_relay_url(relay_url);
    let auction = Auction::from_config(&config);

    let target = TEST_USERS[0];
    let target_block = 2;

    let first = ConfidentialBundle::new(
        vec![encoded_send(&TEST_SIGNERS[0], target, U256::from(1000), 0)],
        vec![],
        Some(10),
    );
    let peekers = [TEST_USERS[0], TEST_BUILDER];
    let submitted = auction.submit_bundle(
        TEST_USERS[0],
        Submission::new(target_block, U256::from(200), bundle_bytes(&first))
            .with_senders(peekers)
            .with_peekers(peekers),
    )?;
    info!(bid_id = %submitted.bid_id(), reference = %submitted.bundle(), "first bundle");

    let second = ConfidentialBundle::new(
        vec![encoded_send(&TEST_SIGNERS[1], target, U256::from(1000), 0)],
        vec![],
        None,
    );
    let peekers: Vec<Address> = vec![TEST_USERS[0], TEST_USERS[1], TEST_BUILDER];
    let submitted = auction.submit_bundle(
        TEST_USERS[1],
        Submission::new(target_block, U256::from(100), bundle_bytes(&second))
            .with_senders(peekers.clone())
            .with_peekers(peekers),
    )?;
    let log = submitted.encode_log_data();
    let decoded = SendBundleTx::decode_log_data(&log)?;
    info!(bid_id = %decoded.bid_id(), "second bundle");

    let report = auction.build(target_block, &simple_block_args(1)).await?;
    if let Some(err) = report.relay_error {
        eyre::bail!("relay delivery failed: {err}");
    }
    let result = report.outcome.result().ok_or_else(|| eyre::eyre!("nothing was built"))?;
    info!(
        bid_id = %result.bid_id(),
        payload_hash = %result.payload_hash(),
        bundles = result.included().len(),
        "built top of block"
    );
    Ok(())
}
