/// Errors returned when delivering a payload to a relay.
#[derive(thiserror::Error, Debug)]
pub enum RelayError {
    /// An error occurred while parsing the URL.
    #[error(transparent)]
    Url(#[from] url::ParseError),

    /// The relay answered with a non-success status.
    #[error("relay rejected payload with status {0}")]
    Status(reqwest::StatusCode),

    /// The relay could not be reached.
    #[error("error contacting relay: {0}")]
    Transport(reqwest::Error),

    /// A custom sink failed.
    #[error("relay delivery failed: {0}")]
    Custom(String),
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => RelayError::Status(status),
            None => RelayError::Transport(err),
        }
    }
}

impl RelayError {
    /// Create a custom error for sinks that do not speak HTTP.
    pub fn custom(msg: impl core::fmt::Display) -> Self {
        Self::Custom(msg.to_string())
    }
}
