//! HTTP implementations of the store and bus seams.
//!
//! Both clients speak plain HTTP/JSON against gateway-style REST surfaces:
//!
//! - the store gateway exposes `GET {base}/{container}/list` returning a JSON
//!   page of `{name, size_bytes}` descriptors plus an optional continuation
//!   cursor, and `GET {base}/{container}/{blob-name}` returning raw bytes
//! - the bus exposes `POST {base}/{hub}/messages` accepting one JSON document
//!
//! Authentication is an opaque pre-built SAS token placed on the
//! Authorization header; building tokens from key material belongs to the
//! credential layer, not here. The underlying `ureq` agent is blocking, so
//! every call is wrapped in `spawn_blocking`.

use std::io::Read;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use replay_types::BlobPage;

use crate::bus::MessageBus;
use crate::store::BlobStore;

/// HTTP client for the capture blob store.
#[derive(Clone, Debug)]
pub struct HttpBlobStore {
    /// Base URL of the store gateway.
    base_url: String,
    /// Container holding the capture blobs.
    container: String,
    /// Opaque SAS token sent as the Authorization header.
    sas_token: String,
    agent: ureq::Agent,
}

impl HttpBlobStore {
    /// Create a client for a storage account using the conventional
    /// `https://{account}.blob.core.windows.net` endpoint.
    pub fn new(account: &str, container: impl Into<String>, sas_token: impl Into<String>) -> Self {
        Self::with_base_url(
            format!("https://{account}.blob.core.windows.net"),
            container,
            sas_token,
        )
    }

    /// Create a client against an explicit gateway endpoint.
    pub fn with_base_url(
        base_url: impl Into<String>,
        container: impl Into<String>,
        sas_token: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            container: container.into(),
            sas_token: sas_token.into(),
            agent: ureq::Agent::new(),
        }
    }

    fn list_page_blocking(&self, prefix: Option<&str>, cursor: Option<&str>) -> Result<BlobPage> {
        let url = format!("{}/{}/list", self.base_url, self.container);
        let mut request = self.agent.get(&url).set("Authorization", &self.sas_token);
        // query() URL-encodes the values; prefixes can carry characters that
        // would otherwise corrupt the query string.
        if let Some(prefix) = prefix {
            request = request.query("prefix", prefix);
        }
        if let Some(cursor) = cursor {
            request = request.query("cursor", cursor);
        }

        let page: BlobPage = request
            .call()
            .map_err(|e| anyhow!("Failed to list blobs: {}", e))?
            .into_json()
            .map_err(|e| anyhow!("Failed to parse blob listing: {}", e))?;

        Ok(page)
    }

    fn fetch_blocking(&self, name: &str) -> Result<Vec<u8>> {
        let url = format!("{}/{}/{}", self.base_url, self.container, name);

        let response = self
            .agent
            .get(&url)
            .set("Authorization", &self.sas_token)
            .call()
            .map_err(|e| anyhow!("Failed to fetch blob {}: {}", name, e))?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| anyhow!("Failed to read blob {} body: {}", name, e))?;

        Ok(bytes)
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn list_page(&self, prefix: Option<&str>, cursor: Option<&str>) -> Result<BlobPage> {
        let client = self.clone();
        let prefix = prefix.map(str::to_string);
        let cursor = cursor.map(str::to_string);
        tokio::task::spawn_blocking(move || {
            client.list_page_blocking(prefix.as_deref(), cursor.as_deref())
        })
        .await
        .map_err(|e| anyhow!("blob listing task panicked: {}", e))?
    }

    async fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        let client = self.clone();
        let name = name.to_string();
        tokio::task::spawn_blocking(move || client.fetch_blocking(&name))
            .await
            .map_err(|e| anyhow!("blob fetch task panicked: {}", e))?
    }
}

/// HTTP client for the event hub ingestion endpoint.
#[derive(Clone, Debug)]
pub struct HttpMessageBus {
    /// Base URL of the bus namespace.
    base_url: String,
    /// Opaque SAS token sent as the Authorization header.
    sas_token: String,
    agent: ureq::Agent,
}

impl HttpMessageBus {
    /// Create a client for a bus namespace using the conventional
    /// `https://{namespace}.servicebus.windows.net` endpoint.
    pub fn new(namespace: &str, sas_token: impl Into<String>) -> Self {
        Self::with_base_url(format!("https://{namespace}.servicebus.windows.net"), sas_token)
    }

    /// Create a client against an explicit endpoint.
    pub fn with_base_url(base_url: impl Into<String>, sas_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            sas_token: sas_token.into(),
            agent: ureq::Agent::new(),
        }
    }

    fn send_blocking(&self, destination: &str, payload: &str) -> Result<()> {
        let url = format!("{}/{}/messages", self.base_url, destination);

        self.agent
            .post(&url)
            .set("Authorization", &self.sas_token)
            .set("Content-Type", "application/json")
            .send_string(payload)
            .map_err(|e| anyhow!("Failed to send message to {}: {}", destination, e))?;

        Ok(())
    }
}

#[async_trait]
impl MessageBus for HttpMessageBus {
    async fn send(&self, destination: &str, payload: &str) -> Result<()> {
        let client = self.clone();
        let destination = destination.to_string();
        let payload = payload.to_string();
        tokio::task::spawn_blocking(move || client.send_blocking(&destination, &payload))
            .await
            .map_err(|e| anyhow!("bus send task panicked: {}", e))?
    }
}
