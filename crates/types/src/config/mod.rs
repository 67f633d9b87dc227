mod error;
pub use error::ConfigError;

/// Helpers for loading values from the environment.
pub mod env_utils;

use alloy::primitives::Address;
use std::num::NonZeroUsize;
use url::Url;

/// Environment variable holding the builder's gate identity.
pub const BUILDER_IDENTITY_ENV: &str = "PEPC_BUILDER_IDENTITY";
/// Environment variable holding the relay URL.
pub const RELAY_URL_ENV: &str = "PEPC_RELAY_URL";
/// Environment variable toggling strict builds.
pub const STRICT_BUILD_ENV: &str = "PEPC_STRICT_BUILD";
/// Environment variable capping the bundles per payload.
pub const MAX_BUNDLES_ENV: &str = "PEPC_MAX_BUNDLES";

/// Auction configuration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionConfig {
    /// The identity the block builder presents when reading bundles. Bundles
    /// that do not list it as a peeker are excluded from builds.
    pub builder_identity: Address,

    /// Relay endpoint that receives sealed payloads.
    #[serde(default)]
    pub relay_url: Option<Url>,

    /// Abort a build when any eligible bundle is unreadable, instead of
    /// excluding it.
    #[serde(default)]
    pub strict_build: bool,

    /// Maximum number of bundles composed into a single payload. Must be
    /// positive when set.
    #[serde(default)]
    pub max_bundles: Option<NonZeroUsize>,
}

impl AuctionConfig {
    /// Create a permissive configuration for the given builder identity.
    pub const fn new(builder_identity: Address) -> Self {
        Self { builder_identity, relay_url: None, strict_build: false, max_bundles: None }
    }

    /// Set the relay URL.
    pub fn with_relay_url(mut self, url: Url) -> Self {
        self.relay_url = Some(url);
        self
    }

    /// Enable or disable strict builds.
    pub const fn with_strict_build(mut self, strict: bool) -> Self {
        self.strict_build = strict;
        self
    }

    /// Cap the number of bundles per payload.
    pub const fn with_max_bundles(mut self, max: NonZeroUsize) -> Self {
        self.max_bundles = Some(max);
        self
    }

    /// Load the configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            builder_identity: env_utils::load_address(BUILDER_IDENTITY_ENV)?,
            relay_url: env_utils::load_url_opt(RELAY_URL_ENV)?,
            strict_build: env_utils::load_bool(STRICT_BUILD_ENV)?,
            max_bundles: env_utils::load_nonzero_usize_opt(MAX_BUNDLES_ENV)?,
        })
    }

    /// Load the configuration from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(Into::into)
    }
}
