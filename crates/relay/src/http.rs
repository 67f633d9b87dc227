use crate::{RelayError, RelaySink};
use alloy::primitives::Bytes;
use reqwest::header::CONTENT_TYPE;
use tracing::{instrument, warn};

/// Pushes payloads to a relay over HTTP.
///
/// Each payload is sent as the body of a single `POST` to the relay URL, with
/// the payload's content type as the `Content-Type` header. Any non-2xx status
/// is a delivery failure. There are no retries.
#[derive(Debug, Clone)]
pub struct HttpRelay {
    /// The URL of the relay.
    url: reqwest::Url,
    /// The reqwest client used to send requests.
    client: reqwest::Client,
}

impl HttpRelay {
    /// Create a new relay with the given URL and client.
    pub fn new_with_client(url: reqwest::Url, client: reqwest::Client) -> Self {
        Self { url, client }
    }

    /// Instantiate a new relay with the given URL and a new reqwest client.
    pub fn new(url: reqwest::Url) -> Self {
        Self::new_with_client(url, reqwest::Client::new())
    }

    /// Create a new relay given a string URL.
    pub fn new_from_string(url: &str) -> Result<Self, RelayError> {
        let url = reqwest::Url::parse(url)?;
        Ok(Self::new(url))
    }

    /// Get the relay URL.
    pub const fn url(&self) -> &reqwest::Url {
        &self.url
    }

    /// Get the client used to send requests
    pub const fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

#[async_trait::async_trait]
impl RelaySink for HttpRelay {
    #[instrument(skip_all, fields(url = %self.url, len = payload.len(), content_type = content_type))]
    async fn push(&self, payload: Bytes, content_type: &'static str) -> Result<(), RelayError> {
        self.client
            .post(self.url.clone())
            .header(CONTENT_TYPE, content_type)
            .body(payload.to_vec())
            .send()
            .await
            .inspect_err(|e| warn!(%e, "Failed to reach relay"))?
            .error_for_status()
            .inspect_err(|e| warn!(%e, "Relay rejected payload"))
            .map(drop)
            .map_err(Into::into)
    }
}
