//! Byte sources for archives and the date index.
//!
//! Archives are published as `{date}.zip` next to a JSON array of dates. Both
//! the HTTP and the directory backend use the same layout.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chips_core::ChipsError;

/// Opaque byte source for per-date archives.
#[async_trait]
pub trait ArchiveSource: Send + Sync {
    /// Human-readable source name.
    fn name(&self) -> &str;
    /// Fetch the raw bytes of `{date}.zip`.
    async fn fetch_archive(&self, date: &str) -> Result<Bytes, ChipsError>;
    /// Fetch the date index (unsorted, as published).
    async fn fetch_date_index(&self) -> Result<Vec<String>, ChipsError>;
}

/// Parse a date index document (`["20251111", "20251110", ...]`).
pub fn parse_date_index(raw: &[u8]) -> Result<Vec<String>, ChipsError> {
    serde_json::from_slice(raw).map_err(|e| ChipsError::DateIndexUnavailable(format!("bad index json: {e}")))
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

/// Static file host serving archives under `base_url`.
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
    date_index: String,
}

impl HttpSource {
    pub fn new(base_url: &str, date_index: impl Into<String>) -> Result<Self, ChipsError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ChipsError::Config(format!("http client: {e}")))?;
        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string(), date_index: date_index.into() })
    }

    pub fn archive_url(&self, date: &str) -> String {
        format!("{}/{date}.zip", self.base_url)
    }

    pub fn date_index_url(&self) -> String {
        format!("{}/{}", self.base_url, self.date_index)
    }

    async fn get_bytes(&self, url: &str) -> Result<Bytes, String> {
        let resp = self.client.get(url).send().await.map_err(|e| e.to_string())?;
        let status = resp.status();
        if !status.is_success() {
            return Err(format!("HTTP {status}"));
        }
        resp.bytes().await.map_err(|e| e.to_string())
    }
}

#[async_trait]
impl ArchiveSource for HttpSource {
    fn name(&self) -> &str {
        &self.base_url
    }

    async fn fetch_archive(&self, date: &str) -> Result<Bytes, ChipsError> {
        let url = self.archive_url(date);
        self.get_bytes(&url).await.map_err(|reason| ChipsError::ArchiveUnavailable {
            date: date.to_string(),
            reason: format!("{url}: {reason}"),
        })
    }

    async fn fetch_date_index(&self) -> Result<Vec<String>, ChipsError> {
        let url = self.date_index_url();
        let raw = self
            .get_bytes(&url)
            .await
            .map_err(|reason| ChipsError::DateIndexUnavailable(format!("{url}: {reason}")))?;
        parse_date_index(&raw)
    }
}

// ---------------------------------------------------------------------------
// Local directory
// ---------------------------------------------------------------------------

/// Directory holding `{date}.zip` files and the date index.
pub struct DirSource {
    root: PathBuf,
    date_index: String,
    label: String,
}

impl DirSource {
    pub fn new(root: PathBuf, date_index: impl Into<String>) -> Self {
        let label = root.display().to_string();
        Self { root, date_index: date_index.into(), label }
    }
}

#[async_trait]
impl ArchiveSource for DirSource {
    fn name(&self) -> &str {
        &self.label
    }

    async fn fetch_archive(&self, date: &str) -> Result<Bytes, ChipsError> {
        let path = self.root.join(format!("{date}.zip"));
        tokio::fs::read(&path).await.map(Bytes::from).map_err(|e| ChipsError::ArchiveUnavailable {
            date: date.to_string(),
            reason: format!("{}: {e}", path.display()),
        })
    }

    async fn fetch_date_index(&self) -> Result<Vec<String>, ChipsError> {
        let path = self.root.join(&self.date_index);
        let raw = tokio::fs::read(&path)
            .await
            .map_err(|e| ChipsError::DateIndexUnavailable(format!("{}: {e}", path.display())))?;
        parse_date_index(&raw)
    }
}
