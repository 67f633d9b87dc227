//! Tests for delivery to an HTTP relay.

use alloy::primitives::{Address, U256};
use axum::{extract::State, http::StatusCode, routing::post, Router};
use pepc_auction::{AbiCoder, Auction};
use pepc_relay::RelayError;
use pepc_test_utils::{
    init_tracing,
    specs::{private_submission, simple_block_args, simple_bundle},
    users::{TEST_BUILDER, TEST_SIGNERS, TEST_USERS},
};
use pepc_types::config::AuctionConfig;
use tokio::sync::mpsc;

const RECIPIENT: Address = Address::repeat_byte(0x51);

/// Content type and body of a request received by the relay.
type Request = (Option<String>, Vec<u8>);

async fn spawn_relay(status: StatusCode) -> (url::Url, mpsc::UnboundedReceiver<Request>) {
    let (tx, rx) = mpsc::unbounded_channel();

    let app = Router::new()
        .route(
            "/relay",
            post(
                move |State(tx): State<mpsc::UnboundedSender<Request>>,
                      headers: axum::http::HeaderMap,
                      body: axum::body::Bytes| async move {
                    let content_type = headers
                        .get(axum::http::header::CONTENT_TYPE)
                        .and_then(|v| v.to_str().ok())
                        .map(ToOwned::to_owned);
                    let _ = tx.send((content_type, body.to_vec()));
                    status
                },
            ),
        )
        .with_state(tx);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    (format!("http://{addr}/relay").parse().unwrap(), rx)
}

#[tokio::test]
async fn sealed_payload_is_posted() {
    init_tracing();
    let (url, mut rx) = spawn_relay(StatusCode::OK).await;
    let auction = Auction::from_config(&AuctionConfig::new(TEST_BUILDER).with_relay_url(url));

    let bundle = simple_bundle(&TEST_SIGNERS[0], RECIPIENT, 1);
    auction
        .submit_bundle(TEST_USERS[0], private_submission(TEST_USERS[0], 2, 10, &bundle))
        .unwrap();

    let report = auction.build(2, &simple_block_args(2)).await.unwrap();
    assert!(report.delivered());

    let (content_type, body) = rx.recv().await.unwrap();
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert_eq!(&body[..], &report.outcome.result().unwrap().payload()[..]);
}

#[tokio::test]
async fn abi_payload_is_labelled_octet_stream() {
    let (url, mut rx) = spawn_relay(StatusCode::OK).await;
    let auction = Auction::from_config(&AuctionConfig::new(TEST_BUILDER).with_relay_url(url))
        .with_coder(AbiCoder);

    let bundle = simple_bundle(&TEST_SIGNERS[1], RECIPIENT, 2);
    auction
        .submit_bundle(TEST_USERS[1], private_submission(TEST_USERS[1], 3, 10, &bundle))
        .unwrap();

    let report = auction.build(3, &simple_block_args(3)).await.unwrap();
    assert!(report.delivered());

    let (content_type, body) = rx.recv().await.unwrap();
    assert_eq!(content_type.as_deref(), Some("application/octet-stream"));
    assert_eq!(&body[..], &report.outcome.result().unwrap().payload()[..]);
    assert_eq!(body[..32], U256::from(3).to_be_bytes::<32>());
}

#[tokio::test]
async fn rejected_payload_is_reported() {
    let (url, _rx) = spawn_relay(StatusCode::INTERNAL_SERVER_ERROR).await;
    let auction = Auction::from_config(&AuctionConfig::new(TEST_BUILDER).with_relay_url(url));

    let bundle = simple_bundle(&TEST_SIGNERS[0], RECIPIENT, 1);
    auction
        .submit_bundle(TEST_USERS[0], private_submission(TEST_USERS[0], 2, 10, &bundle))
        .unwrap();

    let report = auction.build(2, &simple_block_args(2)).await.unwrap();
    assert!(report.outcome.is_fresh());
    assert!(matches!(
        report.relay_error,
        Some(RelayError::Status(status)) if status == StatusCode::INTERNAL_SERVER_ERROR
    ));
    assert!(auction.ledger().phase(2).is_sealed());
}
