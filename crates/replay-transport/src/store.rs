//! Object store seam and the paged catalog scanner.

use std::collections::VecDeque;

use anyhow::Result;
use async_trait::async_trait;

use replay_types::{BlobDescriptor, BlobPage};

/// Object store collaborator.
///
/// Two operations, matching what the pipeline needs from any store: a paged
/// listing under an optional path prefix, and whole-blob retrieval. Listing
/// failures are fatal to a run; fetch failures are blob-scoped.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// List one page of blobs, optionally filtered by path prefix and
    /// continued from a previous page's cursor.
    async fn list_page(&self, prefix: Option<&str>, cursor: Option<&str>) -> Result<BlobPage>;

    /// Fetch the complete content of one blob.
    ///
    /// The whole blob is materialized in memory; there is no streaming read.
    async fn fetch(&self, name: &str) -> Result<Vec<u8>>;
}

/// Lazy scanner over a container's blob catalog.
///
/// Pulls listing pages on demand and yields descriptors one at a time, in the
/// order the store returns them. The sequence is finite (bounded by container
/// contents at call time) and restartable from the start by constructing a
/// new catalog. No filtering happens here.
pub struct BlobCatalog<'a> {
    store: &'a dyn BlobStore,
    prefix: Option<String>,
    cursor: Option<String>,
    buffered: VecDeque<BlobDescriptor>,
    exhausted: bool,
}

impl<'a> BlobCatalog<'a> {
    pub fn new(store: &'a dyn BlobStore, prefix: Option<&str>) -> Self {
        Self {
            store,
            prefix: prefix.map(str::to_string),
            cursor: None,
            buffered: VecDeque::new(),
            exhausted: false,
        }
    }

    /// Yield the next descriptor, pulling a new page from the store when the
    /// buffered one runs out. Returns `Ok(None)` once the listing is
    /// exhausted; a listing error aborts the scan.
    pub async fn next(&mut self) -> Result<Option<BlobDescriptor>> {
        loop {
            if let Some(blob) = self.buffered.pop_front() {
                return Ok(Some(blob));
            }
            if self.exhausted {
                return Ok(None);
            }

            let page = self
                .store
                .list_page(self.prefix.as_deref(), self.cursor.as_deref())
                .await?;
            self.cursor = page.next_cursor;
            if self.cursor.is_none() {
                self.exhausted = true;
            }
            if page.blobs.is_empty() && self.exhausted {
                return Ok(None);
            }
            self.buffered.extend(page.blobs);
        }
    }
}
