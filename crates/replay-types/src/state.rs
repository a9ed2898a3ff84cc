//! Per-blob processing phases and per-run accounting.

use serde::{Deserialize, Serialize};

use crate::error::BlobError;

/// How far a single blob got through the pipeline.
///
/// Diagnostic only: the phase is attached to blob-scoped errors so a failure
/// reads as "this blob, in this phase". It is never persisted; a restarted
/// run re-scans and re-replays from the beginning of the filtered set.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplayPhase {
    Discovered,
    Fetched,
    Parsed,
    Dispatching,
    Done,
    Failed,
}

impl std::fmt::Display for ReplayPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ReplayPhase::Discovered => "discovered",
            ReplayPhase::Fetched => "fetched",
            ReplayPhase::Parsed => "parsed",
            ReplayPhase::Dispatching => "dispatching",
            ReplayPhase::Done => "done",
            ReplayPhase::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Typed result of processing one blob.
///
/// The orchestrator pattern-matches on this to decide whether to continue
/// with the next blob (everything except `Cancelled`) or wind the run down.
#[derive(Debug)]
pub enum BlobOutcome {
    /// Every message in the blob's batch was sent.
    Done { messages_sent: usize },
    /// The blob was ineligible (wrong extension or placeholder size). Not an
    /// error; skipped without a fetch.
    Skipped,
    /// The blob failed in the recorded phase; later blobs are unaffected.
    Failed(BlobError),
    /// A stop request arrived mid-blob; `messages_sent` were already out.
    Cancelled { messages_sent: usize },
}

/// Aggregate counters for one replay run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaySummary {
    /// Descriptors seen in the catalog scan.
    pub blobs_seen: usize,
    /// Blobs rejected by the eligibility filter.
    pub skipped: usize,
    /// Blobs fully replayed.
    pub replayed: usize,
    /// Blobs abandoned to a blob-scoped error.
    pub failed: usize,
    /// Messages actually handed to the bus, across all blobs.
    pub messages_sent: usize,
    /// True when the run stopped early on a cancellation request.
    pub cancelled: bool,
}

impl ReplaySummary {
    /// Fold one blob's outcome into the run counters.
    pub fn record(&mut self, outcome: &BlobOutcome) {
        match outcome {
            BlobOutcome::Done { messages_sent } => {
                self.replayed += 1;
                self.messages_sent += messages_sent;
            }
            BlobOutcome::Skipped => self.skipped += 1,
            BlobOutcome::Failed(_) => self.failed += 1,
            BlobOutcome::Cancelled { messages_sent } => {
                self.messages_sent += messages_sent;
                self.cancelled = true;
            }
        }
    }

    pub fn any_failed(&self) -> bool {
        self.failed > 0
    }
}
