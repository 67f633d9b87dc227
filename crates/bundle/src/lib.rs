//! Pepc Bundle Library
//!
//! Contains the [`ConfidentialBundle`] type submitted by searchers, the
//! [`AccessPolicy`] that scopes who may submit and read it, and the
//! [`BundleStore`] that holds bundle plaintext keyed by bid id.

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

mod bundle;
pub use bundle::ConfidentialBundle;

mod error;
pub use error::{Access, BundleError, RecoverError, StoreError};

mod policy;
pub use policy::AccessPolicy;

mod store;
pub use store::BundleStore;
