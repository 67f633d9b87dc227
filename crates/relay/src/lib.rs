//! Relay sinks for sealed top-of-block payloads.
//!
//! A [`RelaySink`] receives the composed payload bytes once a block is sealed.
//! Delivery is one-way: the sink reports success or failure and nothing else.
//! Retrying a failed delivery is the caller's concern.

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
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
pub use error::RelayError;

mod http;
pub use http::HttpRelay;

mod sink;
pub use sink::{NoopRelay, RelaySink};
