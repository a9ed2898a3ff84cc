//! Catalog listing types.

use serde::{Deserialize, Serialize};

/// One blob as reported by the object store listing.
///
/// The name is a hierarchical path following the capture convention
/// `{Namespace}/{EventHub}/{PartitionId}/{Year}/{Month}/{Day}/{Hour}/{Minute}/{Second}`.
/// Nothing here enforces that structure beyond what the eligibility filter
/// checks; the descriptor is carried through the pipeline as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobDescriptor {
    /// Full path of the blob within its container.
    pub name: String,
    /// Size reported by the listing, in bytes.
    pub size_bytes: u64,
}

impl BlobDescriptor {
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            size_bytes,
        }
    }
}

/// One page of a catalog listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobPage {
    pub blobs: Vec<BlobDescriptor>,
    /// Continuation cursor; `None` means the listing is exhausted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Ordered message payloads extracted from one blob.
///
/// Each entry is a compact JSON document ready for transmission. Order is
/// capture order and must be preserved through dispatch.
pub type MessageBatch = Vec<String>;
