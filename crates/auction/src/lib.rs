//! Pepc Auction Library
//!
//! A sealed-bid auction for transaction bundles targeting a future block, and
//! the builder that composes the winning bundles into a single top-of-block
//! payload.
//!
//! - [`BidLedger`] assigns bid ids, records bids per target block and owns the
//!   per-block [`BlockPhase`] state machine.
//! - [`ConfidentialityGate`] decides which identities may read a bid's bundle
//!   plaintext.
//! - [`TobBuilder`] orders the readable bids for a block and seals the
//!   composed payload.
//! - [`Auction`] ties these together with a [`BundleStore`] and a relay sink.
//!
//! [`BundleStore`]: pepc_bundle::BundleStore

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

mod auction;
pub use auction::{Auction, AuctionEvent, BuildReport, Submission};

mod builder;
pub use builder::{auction_order, BuildOutcome, TobBuilder};

mod built;
pub use built::{BuildResult, TobBundle, TobPayload};

mod coder;
pub use coder::{AbiCoder, JsonCoder, PayloadCoder};

mod error;
pub use error::{AuctionError, BuildError, LedgerError};

mod gate;
pub use gate::ConfidentialityGate;

mod ledger;
pub use ledger::{Bid, BidLedger, BidRegistration, BlockPhase, BuildTicket};
