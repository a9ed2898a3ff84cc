//! Transport layer for capture replay.
//!
//! Collaborator seams for the two external systems the pipeline talks to:
//!
//! - [`store`]: the object store holding captured blobs ([`BlobStore`] trait,
//!   plus the paged [`BlobCatalog`] scanner)
//! - [`bus`]: the message bus replayed events are sent to ([`MessageBus`])
//! - [`http`]: HTTP implementations of both seams
//! - [`memory`]: in-memory implementations for tests and dry runs
//!
//! # Example
//!
//! ```ignore
//! use replay_transport::http::HttpBlobStore;
//! use replay_transport::store::BlobCatalog;
//!
//! let store = HttpBlobStore::new("captureacct", "capture", sas_token);
//! let mut catalog = BlobCatalog::new(&store, Some("ns/hub/0"));
//! while let Some(blob) = catalog.next().await? {
//!     println!("{} ({} bytes)", blob.name, blob.size_bytes);
//! }
//! ```

pub mod bus;
pub mod http;
pub mod memory;
pub mod store;

// Re-export main types for convenience
pub use bus::MessageBus;
pub use http::{HttpBlobStore, HttpMessageBus};
pub use memory::{MemoryBlobStore, MemoryBus};
pub use store::{BlobCatalog, BlobStore};
