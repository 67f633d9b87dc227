use alloy::primitives::Bytes;
use parking_lot::Mutex;
use pepc_relay::{RelayError, RelaySink};
use std::sync::Arc;

/// A relay that records every payload it receives, with its content type.
#[derive(Debug, Clone, Default)]
pub struct RecordingRelay {
    payloads: Arc<Mutex<Vec<(Bytes, &'static str)>>>,
}

impl RecordingRelay {
    /// Create an empty recording relay.
    pub fn new() -> Self {
        Self::default()
    }

    /// The payloads received so far, in order.
    pub fn payloads(&self) -> Vec<Bytes> {
        self.payloads.lock().iter().map(|(payload, _)| payload.clone()).collect()
    }

    /// The content types the payloads were pushed with, in order.
    pub fn content_types(&self) -> Vec<&'static str> {
        self.payloads.lock().iter().map(|(_, content_type)| *content_type).collect()
    }

    /// Number of payloads received.
    pub fn len(&self) -> usize {
        self.payloads.lock().len()
    }

    /// True if no payload was received.
    pub fn is_empty(&self) -> bool {
        self.payloads.lock().is_empty()
    }
}

#[async_trait::async_trait]
impl RelaySink for RecordingRelay {
    async fn push(&self, payload: Bytes, content_type: &'static str) -> Result<(), RelayError> {
        self.payloads.lock().push((payload, content_type));
        Ok(())
    }
}

/// A relay that rejects every payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingRelay;

#[async_trait::async_trait]
impl RelaySink for FailingRelay {
    async fn push(&self, _: Bytes, _: &'static str) -> Result<(), RelayError> {
        Err(RelayError::custom("relay unavailable"))
    }
}
