//! Replay pipeline for captured event blobs.
//!
//! The pipeline runs Scanner → Filter → Fetcher → Extractor → Dispatcher per
//! blob, sequentially, with per-blob fault isolation:
//!
//! - [`filter`]: pure eligibility predicate over listing descriptors
//! - [`extract`]: JSON-array blob bytes → ordered message batch
//! - [`pacing`]: injectable inter-message pacing policy
//! - [`dispatch`]: in-order, one-at-a-time paced sends to the bus
//! - [`orchestrator`]: drives the full catalog scan to completion
//!
//! # Example
//!
//! ```ignore
//! use replay_core::{Dispatcher, Orchestrator};
//! use replay_core::pacing::FixedInterval;
//!
//! let dispatcher = Dispatcher::new(bus, "myhub", Arc::new(FixedInterval::from_millis(100)));
//! let orchestrator = Orchestrator::new(store, dispatcher);
//! let summary = orchestrator.run(Some("ns/hub/0"), &token).await?;
//! ```

pub mod dispatch;
pub mod extract;
pub mod filter;
pub mod orchestrator;
pub mod pacing;

pub use dispatch::{DispatchStatus, Dispatcher};
pub use extract::extract_messages;
pub use filter::is_eligible;
pub use orchestrator::Orchestrator;
pub use pacing::{FixedInterval, NoPacing, PacingPolicy};
