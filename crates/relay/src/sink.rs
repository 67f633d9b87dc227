use crate::RelayError;
use alloy::primitives::Bytes;
use std::sync::Arc;

/// A one-way sink for sealed payloads.
#[async_trait::async_trait]
pub trait RelaySink: Send + Sync {
    /// Push a payload to the relay. `content_type` names the payload's
    /// encoding, e.g. `application/json`.
    async fn push(&self, payload: Bytes, content_type: &'static str) -> Result<(), RelayError>;
}

#[async_trait::async_trait]
impl<T> RelaySink for Arc<T>
where
    T: RelaySink + ?Sized,
{
    async fn push(&self, payload: Bytes, content_type: &'static str) -> Result<(), RelayError> {
        (**self).push(payload, content_type).await
    }
}

#[async_trait::async_trait]
impl<T> RelaySink for Box<T>
where
    T: RelaySink + ?Sized,
{
    async fn push(&self, payload: Bytes, content_type: &'static str) -> Result<(), RelayError> {
        (**self).push(payload, content_type).await
    }
}

/// A sink that drops every payload. Used when no relay is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRelay;

#[async_trait::async_trait]
impl RelaySink for NoopRelay {
    async fn push(&self, payload: Bytes, content_type: &'static str) -> Result<(), RelayError> {
        tracing::debug!(len = payload.len(), content_type, "no relay configured, dropping payload");
        Ok(())
    }
}
