//! Replay orchestration.
//!
//! Drives the full container scan to completion: pulls descriptors from the
//! catalog, applies the eligibility filter, and runs fetch → extract →
//! dispatch per surviving blob. One blob's failure never halts the scan of
//! subsequent blobs; only a listing error (no catalog to iterate) or a
//! cancellation request ends the run early.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use replay_transport::{BlobCatalog, BlobStore};
use replay_types::{BlobDescriptor, BlobError, BlobOutcome, ReplayPhase, ReplaySummary};

use crate::dispatch::{DispatchStatus, Dispatcher};
use crate::extract::extract_messages;
use crate::filter::is_eligible;

pub struct Orchestrator {
    store: Arc<dyn BlobStore>,
    dispatcher: Dispatcher,
}

impl Orchestrator {
    pub fn new(store: Arc<dyn BlobStore>, dispatcher: Dispatcher) -> Self {
        Self { store, dispatcher }
    }

    /// Replay every eligible blob under the prefix, in listing order.
    ///
    /// Returns the aggregate summary; the only error path out of here is a
    /// failed catalog listing, which aborts the whole run. Re-running against
    /// an unchanged container reproduces an identical ordered sequence of
    /// dispatched payloads.
    pub async fn run(
        &self,
        prefix: Option<&str>,
        token: &CancellationToken,
    ) -> Result<ReplaySummary> {
        let mut catalog = BlobCatalog::new(self.store.as_ref(), prefix);
        let mut summary = ReplaySummary::default();

        loop {
            if token.is_cancelled() {
                warn!("stop requested, ending catalog scan");
                summary.cancelled = true;
                break;
            }

            let blob = match catalog.next().await.context("catalog listing failed")? {
                Some(blob) => blob,
                None => break,
            };
            summary.blobs_seen += 1;

            let outcome = if is_eligible(&blob) {
                self.process_blob(&blob, token).await
            } else {
                debug!(blob = %blob.name, size = blob.size_bytes, "skipping ineligible blob");
                BlobOutcome::Skipped
            };

            match &outcome {
                BlobOutcome::Done { messages_sent } => {
                    info!(blob = %blob.name, messages = messages_sent, "finished blob");
                }
                BlobOutcome::Skipped => {}
                BlobOutcome::Failed(err) => {
                    error!(
                        blob = %err.name,
                        phase = %err.phase,
                        error = %err.source,
                        "blob failed, skipping to next"
                    );
                }
                BlobOutcome::Cancelled { messages_sent } => {
                    warn!(
                        blob = %blob.name,
                        messages = messages_sent,
                        "stop requested mid-blob"
                    );
                }
            }
            summary.record(&outcome);

            if summary.cancelled {
                break;
            }
        }

        info!(
            blobs_seen = summary.blobs_seen,
            replayed = summary.replayed,
            skipped = summary.skipped,
            failed = summary.failed,
            messages_sent = summary.messages_sent,
            cancelled = summary.cancelled,
            "replay run finished"
        );
        Ok(summary)
    }

    /// Run one eligible blob through fetch → extract → dispatch.
    ///
    /// The phase marker tracks the last completed step, so a failure is
    /// reported as "this blob, in this state". Errors here are contained to
    /// the blob; the caller moves on to the next one.
    async fn process_blob(&self, blob: &BlobDescriptor, token: &CancellationToken) -> BlobOutcome {
        info!(blob = %blob.name, size = blob.size_bytes, "downloading blob");
        let content = match self.store.fetch(&blob.name).await {
            Ok(content) => content,
            Err(e) => {
                return BlobOutcome::Failed(BlobError::new(&blob.name, ReplayPhase::Discovered, e))
            }
        };
        info!(blob = %blob.name, bytes = content.len(), "downloaded blob");

        let batch = match extract_messages(&content) {
            Ok(batch) => batch,
            Err(e) => {
                return BlobOutcome::Failed(BlobError::new(&blob.name, ReplayPhase::Fetched, e))
            }
        };
        drop(content);
        info!(blob = %blob.name, messages = batch.len(), "sending messages");

        let outcome = self.dispatcher.dispatch(&blob.name, &batch, token).await;
        match outcome.status {
            DispatchStatus::Completed => BlobOutcome::Done {
                messages_sent: outcome.sent,
            },
            DispatchStatus::Cancelled => BlobOutcome::Cancelled {
                messages_sent: outcome.sent,
            },
            DispatchStatus::Failed(e) => BlobOutcome::Failed(BlobError::new(
                &blob.name,
                ReplayPhase::Dispatching,
                e,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pacing::NoPacing;
    use replay_transport::{MemoryBlobStore, MemoryBus};

    fn orchestrator(store: MemoryBlobStore, bus: Arc<MemoryBus>) -> Orchestrator {
        let dispatcher = Dispatcher::new(bus, "myhub", Arc::new(NoPacing));
        Orchestrator::new(Arc::new(store), dispatcher)
    }

    #[tokio::test]
    async fn malformed_blob_fails_but_the_scan_continues() {
        let mut store = MemoryBlobStore::new();
        store.insert_with_size("ns/hub/0/bad.json", 1000, b"not json at all".to_vec());
        store.insert_with_size("ns/hub/0/good.json", 1000, br#"[{"id":1}]"#.to_vec());
        let bus = Arc::new(MemoryBus::new());

        let summary = orchestrator(store, bus.clone())
            .run(None, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.replayed, 1);
        assert_eq!(bus.payloads(), vec![r#"{"id":1}"#]);
    }

    #[tokio::test]
    async fn non_array_top_level_sends_nothing_for_that_blob() {
        let mut store = MemoryBlobStore::new();
        store.insert_with_size("ns/hub/0/object.json", 1000, br#"{"id":1}"#.to_vec());
        let bus = Arc::new(MemoryBus::new());

        let summary = orchestrator(store, bus.clone())
            .run(None, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.messages_sent, 0);
        assert!(bus.payloads().is_empty());
    }

    #[tokio::test]
    async fn mid_batch_send_failure_does_not_affect_the_next_blob() {
        let mut store = MemoryBlobStore::new();
        store.insert_with_size(
            "ns/hub/0/first.json",
            1000,
            br#"[{"id":1},{"id":2},{"id":3}]"#.to_vec(),
        );
        store.insert_with_size("ns/hub/0/second.json", 1000, br#"[{"id":4}]"#.to_vec());
        let bus = Arc::new(MemoryBus::new());
        bus.fail_on_attempt(2);

        let summary = orchestrator(store, bus.clone())
            .run(None, &CancellationToken::new())
            .await
            .unwrap();

        // {"id":2} failed, {"id":3} was never attempted, second blob replayed.
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.replayed, 1);
        assert_eq!(bus.payloads(), vec![r#"{"id":1}"#, r#"{"id":4}"#]);
    }

    #[tokio::test]
    async fn fetch_failure_is_blob_scoped() {
        // Listed but not fetchable: descriptor without content.
        struct ListOnlyStore(MemoryBlobStore);

        #[async_trait::async_trait]
        impl BlobStore for ListOnlyStore {
            async fn list_page(
                &self,
                prefix: Option<&str>,
                cursor: Option<&str>,
            ) -> Result<replay_types::BlobPage> {
                self.0.list_page(prefix, cursor).await
            }
            async fn fetch(&self, name: &str) -> Result<Vec<u8>> {
                anyhow::bail!("transient store error fetching {name}")
            }
        }

        let mut inner = MemoryBlobStore::new();
        inner.insert_with_size("ns/hub/0/gone.json", 1000, Vec::new());
        let bus = Arc::new(MemoryBus::new());
        let dispatcher = Dispatcher::new(bus.clone(), "myhub", Arc::new(NoPacing));
        let orchestrator = Orchestrator::new(Arc::new(ListOnlyStore(inner)), dispatcher);

        let summary = orchestrator
            .run(None, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(summary.failed, 1);
        assert!(bus.payloads().is_empty());
    }

    #[tokio::test]
    async fn listing_failure_aborts_the_run() {
        struct BrokenStore;

        #[async_trait::async_trait]
        impl BlobStore for BrokenStore {
            async fn list_page(
                &self,
                _prefix: Option<&str>,
                _cursor: Option<&str>,
            ) -> Result<replay_types::BlobPage> {
                anyhow::bail!("listing unavailable")
            }
            async fn fetch(&self, _name: &str) -> Result<Vec<u8>> {
                unreachable!("fetch is never reached when listing fails")
            }
        }

        let bus = Arc::new(MemoryBus::new());
        let dispatcher = Dispatcher::new(bus, "myhub", Arc::new(NoPacing));
        let orchestrator = Orchestrator::new(Arc::new(BrokenStore), dispatcher);

        let err = orchestrator
            .run(None, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("catalog listing failed"));
    }

    #[tokio::test]
    async fn cancellation_before_the_scan_processes_nothing() {
        let mut store = MemoryBlobStore::new();
        store.insert_with_size("ns/hub/0/a.json", 1000, br#"[{"id":1}]"#.to_vec());
        let bus = Arc::new(MemoryBus::new());
        let token = CancellationToken::new();
        token.cancel();

        let summary = orchestrator(store, bus.clone())
            .run(None, &token)
            .await
            .unwrap();

        assert!(summary.cancelled);
        assert_eq!(summary.blobs_seen, 0);
        assert!(bus.payloads().is_empty());
    }
}
