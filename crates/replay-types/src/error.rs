//! Typed errors for the replay pipeline.

use thiserror::Error;

use crate::state::ReplayPhase;

/// A failure attributed to and contained within one blob.
///
/// Carries the phase the blob had reached when the failure happened, so the
/// orchestrator can log "blob X failed while in state Y" and move on to the
/// next blob.
#[derive(Debug, Error)]
#[error("blob {name} failed in phase {phase}")]
pub struct BlobError {
    /// Full path of the failing blob.
    pub name: String,
    /// Last phase the blob reached before the failure.
    pub phase: ReplayPhase,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl BlobError {
    pub fn new(name: impl Into<String>, phase: ReplayPhase, source: anyhow::Error) -> Self {
        Self {
            name: name.into(),
            phase,
            source: source.into(),
        }
    }
}

/// A fatal configuration error; nothing is scanned when one of these fires.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
}
