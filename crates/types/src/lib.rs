//! Shared types for the pepc top-of-block auction.
//!
//! Contains the opaque [`BidId`] and [`BundleRef`] identifiers, the
//! [`BlockArgs`] a block is built against, the Solidity event bindings emitted
//! on submission and build, and the [`AuctionConfig`] loaded at startup.

#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    clippy::missing_const_for_fn,
    rustdoc::all
)]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![deny(unused_must_use, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod bid;
pub use bid::{BidId, BundleRef};

mod bindings;
pub use bindings::{BuildBlock, BuildBlockArgs, SendBundleTx, SolWithdrawal};

mod block_args;
pub use block_args::{BlockArgs, Withdrawal};

/// Auction configuration and environment helpers.
pub mod config;
pub use config::{AuctionConfig, ConfigError};
