use crate::specs::make_wallet;
use alloy::{primitives::Address, signers::local::PrivateKeySigner};
use std::sync::LazyLock;

/// Test signers used in tests.
pub static TEST_SIGNERS: LazyLock<[PrivateKeySigner; 10]> =
    LazyLock::new(|| core::array::from_fn(|i| make_wallet(i as u8 + 1)));

/// Test users used in tests. Addresses corresponding to [`TEST_SIGNERS`].
pub static TEST_USERS: LazyLock<[Address; 10]> =
    LazyLock::new(|| TEST_SIGNERS.each_ref().map(|s| s.address()));

/// Identity the builder presents to the confidentiality gate in tests.
pub const TEST_BUILDER: Address = Address::repeat_byte(0xb1);
