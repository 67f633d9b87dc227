use crate::ConfigError;
use alloy::primitives::Address;
use std::{env, num::NonZeroUsize};
use url::Url;

/// Load a variable from the environment
pub fn load_string(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::missing(key))
}

/// Load a variable from the environment
pub fn load_string_opt(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Load a positive integer from the environment, returning `None` if it is
/// unset. Zero is a parse error.
pub fn load_nonzero_usize_opt(key: &str) -> Result<Option<NonZeroUsize>, ConfigError> {
    load_string_opt(key).map(|val| val.parse::<NonZeroUsize>()).transpose().map_err(Into::into)
}

/// Load a variable from the environment
pub fn load_address(key: &str) -> Result<Address, ConfigError> {
    load_string(key)?.parse().map_err(Into::into)
}

/// Load a variable from the environment, returning `None` if it is unset.
pub fn load_url_opt(key: &str) -> Result<Option<Url>, ConfigError> {
    load_string_opt(key).map(|val| Url::parse(&val)).transpose().map_err(Into::into)
}

/// Load a boolean from the environment. Accepts `true`/`false`/`1`/`0`,
/// case-insensitive. Unset variables load as `false`.
pub fn load_bool(key: &str) -> Result<bool, ConfigError> {
    let Some(val) = load_string_opt(key) else { return Ok(false) };
    match val.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" | "" => Ok(false),
        _ => Err(ConfigError::ParseBool(key.to_string())),
    }
}
