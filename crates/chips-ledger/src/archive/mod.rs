//! Archive resolution — per-date ZIP containers of per-stock ledgers.
//!
//! - [`source`] — the byte-source abstraction and its HTTP / directory backends
//! - [`handle`] — an opened archive
//! - [`cache`] — bounded LRU of opened archives
//!
//! [`ArchiveResolver`] ties them together: a cache hit never touches the
//! source.

pub mod cache;
pub mod handle;
pub mod source;

use std::sync::Arc;

use chips_core::ChipsError;
use chips_core::config::{AppConfig, SourceConfig};
use tokio::sync::Mutex;
use tracing::debug;

pub use self::cache::ArchiveCache;
pub use self::handle::ArchiveHandle;
pub use self::source::{ArchiveSource, DirSource, HttpSource};

/// Build the archive source described by the config.
pub fn source_from_config(config: &AppConfig) -> Result<Arc<dyn ArchiveSource>, ChipsError> {
    let index = config.effective_date_index();
    Ok(match &config.source {
        SourceConfig::Http { base_url } => Arc::new(HttpSource::new(base_url, index)?),
        SourceConfig::Dir { path } => Arc::new(DirSource::new(path.clone(), index)),
    })
}

/// Resolves dates to opened archives, caching them.
pub struct ArchiveResolver {
    source: Arc<dyn ArchiveSource>,
    cache: Mutex<ArchiveCache>,
}

impl ArchiveResolver {
    pub fn new(source: Arc<dyn ArchiveSource>, cache: ArchiveCache) -> Self {
        Self { source, cache: Mutex::new(cache) }
    }

    /// Return the archive for `date`, fetching and caching it on a miss.
    ///
    /// Concurrent misses for the same date may both fetch; the second insert
    /// simply replaces an identical handle.
    pub async fn resolve(&self, date: &str) -> Result<ArchiveHandle, ChipsError> {
        if let Some(handle) = self.cache.lock().await.get(date) {
            debug!(date, "archive cache hit");
            return Ok(handle);
        }

        let bytes = self.source.fetch_archive(date).await?;
        let handle = ArchiveHandle::open(date, bytes)?;
        debug!(date, source = self.source.name(), entries = handle.len(), "archive opened");

        if let Some(evicted) = self.cache.lock().await.insert(date, handle.clone()) {
            debug!(date, evicted = %evicted, "archive cache eviction");
        }
        Ok(handle)
    }

    /// Fetch the raw date index from the underlying source.
    pub async fn fetch_date_index(&self) -> Result<Vec<String>, ChipsError> {
        self.source.fetch_date_index().await
    }

    /// Dates currently cached, least recently used first.
    pub async fn cached_dates(&self) -> Vec<String> {
        self.cache.lock().await.dates()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use bytes::Bytes;

    use super::*;
    use crate::archive::handle::tests::zip_bytes;

    struct CountingSource {
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl ArchiveSource for CountingSource {
        fn name(&self) -> &str {
            "counting"
        }

        async fn fetch_archive(&self, date: &str) -> Result<Bytes, ChipsError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if date == "20250101" {
                return Err(ChipsError::ArchiveUnavailable { date: date.into(), reason: "HTTP 404".into() });
            }
            let path = format!("{date}/2330.csv");
            Ok(zip_bytes(&[(path.as_str(), b"h\n1,A,1,1,0".as_slice())]))
        }

        async fn fetch_date_index(&self) -> Result<Vec<String>, ChipsError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn second_resolve_hits_cache() {
        let source = Arc::new(CountingSource { fetches: AtomicUsize::new(0) });
        let resolver = ArchiveResolver::new(source.clone(), ArchiveCache::new(4));

        let a = resolver.resolve("20251111").await.unwrap();
        let b = resolver.resolve("20251111").await.unwrap();
        assert_eq!(a.date(), b.date());
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(resolver.cached_dates().await, vec!["20251111"]);
    }

    #[tokio::test]
    async fn unavailable_is_not_cached() {
        let source = Arc::new(CountingSource { fetches: AtomicUsize::new(0) });
        let resolver = ArchiveResolver::new(source.clone(), ArchiveCache::new(4));

        assert!(matches!(resolver.resolve("20250101").await, Err(ChipsError::ArchiveUnavailable { .. })));
        assert!(resolver.resolve("20250101").await.is_err());
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
        assert!(resolver.cached_dates().await.is_empty());
    }

    #[tokio::test]
    async fn eviction_refetches() {
        let source = Arc::new(CountingSource { fetches: AtomicUsize::new(0) });
        let resolver = ArchiveResolver::new(source.clone(), ArchiveCache::new(1));

        resolver.resolve("20251110").await.unwrap();
        resolver.resolve("20251111").await.unwrap();
        resolver.resolve("20251110").await.unwrap();
        assert_eq!(source.fetches.load(Ordering::SeqCst), 3);
    }
}
