//! Rate-limited message dispatch.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use replay_transport::MessageBus;

use crate::pacing::PacingPolicy;

/// How a batch dispatch ended.
#[derive(Debug)]
pub enum DispatchStatus {
    /// Every message was sent.
    Completed,
    /// A stop request arrived before the batch finished.
    Cancelled,
    /// A send failed; the remainder of the batch was abandoned, no retry.
    Failed(anyhow::Error),
}

/// Result of dispatching one batch: how many messages went out, and how the
/// batch ended.
#[derive(Debug)]
pub struct DispatchOutcome {
    pub sent: usize,
    pub status: DispatchStatus,
}

/// Sends each message of a batch to the bus in extraction order, one in
/// flight at a time, pausing per the injected pacing policy after every send
/// including the last one of the batch.
pub struct Dispatcher {
    bus: Arc<dyn MessageBus>,
    destination: String,
    pacing: Arc<dyn PacingPolicy>,
    log_payloads: bool,
}

impl Dispatcher {
    pub fn new(
        bus: Arc<dyn MessageBus>,
        destination: impl Into<String>,
        pacing: Arc<dyn PacingPolicy>,
    ) -> Self {
        Self {
            bus,
            destination: destination.into(),
            pacing,
            log_payloads: false,
        }
    }

    /// Also log every payload as it is sent. Noisy; off by default.
    pub fn with_payload_logging(mut self, log_payloads: bool) -> Self {
        self.log_payloads = log_payloads;
        self
    }

    /// Dispatch one blob's batch.
    ///
    /// A failure on message *i* abandons messages *i+1..n* of this batch and
    /// is reported in the outcome; it never affects other blobs. The
    /// cancellation token is observed before each paced wait and interrupts
    /// the wait itself, so a stop request halts promptly.
    pub async fn dispatch(
        &self,
        blob_name: &str,
        batch: &[String],
        token: &CancellationToken,
    ) -> DispatchOutcome {
        let total = batch.len();
        let mut sent = 0;

        for (index, payload) in batch.iter().enumerate() {
            if token.is_cancelled() {
                return DispatchOutcome {
                    sent,
                    status: DispatchStatus::Cancelled,
                };
            }

            info!(
                blob = %blob_name,
                message = index + 1,
                total,
                "sending message"
            );
            if self.log_payloads {
                debug!(payload = %payload, "message payload");
            }

            if let Err(e) = self.bus.send(&self.destination, payload).await {
                error!(
                    blob = %blob_name,
                    message = index + 1,
                    total,
                    error = %e,
                    "send failed, abandoning remainder of batch"
                );
                return DispatchOutcome {
                    sent,
                    status: DispatchStatus::Failed(e),
                };
            }
            sent += 1;

            // Deliberately also pauses after the final message of the batch.
            tokio::select! {
                _ = self.pacing.pause() => {}
                _ = token.cancelled() => {
                    // A cancel during the trailing pause cuts nothing short:
                    // every message of the batch is already out.
                    let status = if sent == total {
                        DispatchStatus::Completed
                    } else {
                        DispatchStatus::Cancelled
                    };
                    return DispatchOutcome { sent, status };
                }
            }
        }

        DispatchOutcome {
            sent,
            status: DispatchStatus::Completed,
        }
    }
}
