//! In-memory store and bus implementations.
//!
//! Stand-ins for the network collaborators, used by the test suites and by
//! the binary's dry-run mode. The store serves a fixed set of blobs with
//! cursor paging like the HTTP gateway; the bus records every payload it is
//! handed and can be primed to fail a specific send attempt.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use parking_lot::Mutex;

use replay_types::{BlobDescriptor, BlobPage};

use crate::bus::MessageBus;
use crate::store::BlobStore;

const DEFAULT_PAGE_SIZE: usize = 500;

/// Fixed in-memory blob store.
pub struct MemoryBlobStore {
    blobs: Vec<(BlobDescriptor, Vec<u8>)>,
    page_size: usize,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self {
            blobs: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Shrink listing pages to exercise cursor handling.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
    }

    /// Add a blob whose listed size is the content length.
    pub fn insert(&mut self, name: impl Into<String>, content: Vec<u8>) {
        let name = name.into();
        let size = content.len() as u64;
        self.blobs.push((BlobDescriptor::new(name, size), content));
    }

    /// Add a blob with an explicit listed size, independent of the content.
    ///
    /// Listings report sizes the fetch path never re-checks, so tests can
    /// model placeholder blobs (small listed size) without crafting padding.
    pub fn insert_with_size(&mut self, name: impl Into<String>, size_bytes: u64, content: Vec<u8>) {
        let name = name.into();
        self.blobs
            .push((BlobDescriptor::new(name, size_bytes), content));
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn list_page(&self, prefix: Option<&str>, cursor: Option<&str>) -> Result<BlobPage> {
        let matching: Vec<&BlobDescriptor> = self
            .blobs
            .iter()
            .map(|(desc, _)| desc)
            .filter(|desc| prefix.map_or(true, |p| desc.name.starts_with(p)))
            .collect();

        let start: usize = match cursor {
            Some(c) => c.parse().map_err(|_| anyhow!("bad cursor: {c}"))?,
            None => 0,
        };
        let end = (start + self.page_size).min(matching.len());
        let blobs = matching[start.min(end)..end].iter().map(|d| (*d).clone()).collect();
        let next_cursor = (end < matching.len()).then(|| end.to_string());

        Ok(BlobPage { blobs, next_cursor })
    }

    async fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        self.blobs
            .iter()
            .find(|(desc, _)| desc.name == name)
            .map(|(_, content)| content.clone())
            .ok_or_else(|| anyhow!("no such blob: {name}"))
    }
}

/// Recording message bus with injectable failure.
pub struct MemoryBus {
    inner: Mutex<MemoryBusInner>,
}

struct MemoryBusInner {
    sent: Vec<(String, String)>,
    attempts: usize,
    fail_on_attempt: Option<usize>,
}

impl MemoryBus {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MemoryBusInner {
                sent: Vec::new(),
                attempts: 0,
                fail_on_attempt: None,
            }),
        }
    }

    /// Make the n-th send attempt (1-indexed, counted across all blobs) fail.
    /// Later attempts succeed again.
    pub fn fail_on_attempt(&self, n: usize) {
        self.inner.lock().fail_on_attempt = Some(n);
    }

    /// Every payload accepted so far, as (destination, payload), in order.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.inner.lock().sent.clone()
    }

    /// Payloads accepted so far, in order, destinations dropped.
    pub fn payloads(&self) -> Vec<String> {
        self.inner
            .lock()
            .sent
            .iter()
            .map(|(_, p)| p.clone())
            .collect()
    }
}

impl Default for MemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageBus for MemoryBus {
    async fn send(&self, destination: &str, payload: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.attempts += 1;
        if inner.fail_on_attempt == Some(inner.attempts) {
            return Err(anyhow!("injected send failure on attempt {}", inner.attempts));
        }
        inner
            .sent
            .push((destination.to_string(), payload.to_string()));
        Ok(())
    }
}
