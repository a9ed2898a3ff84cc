//! Shared types for the capture-replay workspace.
//!
//! This crate provides the foundational types passed between the transport
//! and pipeline crates, breaking circular dependency chains:
//! - [`BlobDescriptor`] / [`BlobPage`] - catalog listing results
//! - [`MessageBatch`] - ordered payloads extracted from one blob
//! - [`ReplayPhase`] / [`BlobOutcome`] / [`ReplaySummary`] - per-blob and
//!   per-run processing results
//! - [`BlobError`] / [`ConfigError`] - the typed error taxonomy

pub mod blob;
pub mod error;
pub mod state;

pub use blob::{BlobDescriptor, BlobPage, MessageBatch};
pub use error::{BlobError, ConfigError};
pub use state::{BlobOutcome, ReplayPhase, ReplaySummary};
