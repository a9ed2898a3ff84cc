//! Message bus seam.

use anyhow::Result;
use async_trait::async_trait;

/// Message bus collaborator.
///
/// A single send-one-message operation; no batch send is assumed. The
/// destination is the event hub (or equivalent) name, the payload an already
/// serialized JSON document. Send failures are blob-scoped: the caller
/// abandons the remainder of the current batch and never retries.
#[async_trait]
pub trait MessageBus: Send + Sync {
    async fn send(&self, destination: &str, payload: &str) -> Result<()>;
}
