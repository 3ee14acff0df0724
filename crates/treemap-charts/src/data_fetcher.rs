//! Dataset fetching over HTTP or from disk, with an optional TTL cache.

use async_trait::async_trait;
use bytes::Bytes;
use moka::future::Cache;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use treemap_common::{Result, TreemapError};
use treemap_config::{DatasetConfig, FetchConfig};

/// Source of raw dataset documents.
#[async_trait]
pub trait DatasetFetcher: Send + Sync {
    /// Fetches the document of a dataset. Every failure is a
    /// [`TreemapError::DatasetLoad`].
    async fn fetch(&self, dataset: &DatasetConfig) -> Result<Bytes>;

    /// Forgets any cached documents so the next fetch goes to the source.
    fn clear_cache(&self) {}
}

/// Fetches datasets over HTTP(S) with connection pooling.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("treemap-explorer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TreemapError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl DatasetFetcher for HttpFetcher {
    async fn fetch(&self, dataset: &DatasetConfig) -> Result<Bytes> {
        let fail = |e: reqwest::Error| TreemapError::dataset_load(&dataset.key, e);

        tracing::debug!(dataset = %dataset.key, url = %dataset.url, "Fetching dataset");
        let response = self
            .client
            .get(&dataset.url)
            .send()
            .await
            .map_err(fail)?
            .error_for_status()
            .map_err(fail)?;
        let body = response.bytes().await.map_err(fail)?;
        tracing::debug!(dataset = %dataset.key, bytes = body.len(), "Dataset fetched");
        Ok(body)
    }
}

/// Reads datasets from `file://` URLs or plain paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFetcher;

impl FileFetcher {
    fn path(dataset: &DatasetConfig) -> Result<PathBuf> {
        if dataset.url.starts_with("file://") {
            let url = url::Url::parse(&dataset.url)
                .map_err(|e| TreemapError::dataset_load(&dataset.key, e))?;
            url.to_file_path().map_err(|()| {
                TreemapError::dataset_load(&dataset.key, format!("not a local file URL: {url}"))
            })
        } else {
            Ok(PathBuf::from(&dataset.url))
        }
    }
}

#[async_trait]
impl DatasetFetcher for FileFetcher {
    async fn fetch(&self, dataset: &DatasetConfig) -> Result<Bytes> {
        let path = Self::path(dataset)?;
        tracing::debug!(dataset = %dataset.key, path = %path.display(), "Reading dataset");
        tokio::fs::read(&path)
            .await
            .map(Bytes::from)
            .map_err(|e| TreemapError::dataset_load(&dataset.key, format!("{}: {e}", path.display())))
    }
}

/// Picks HTTP or file fetching by URL scheme.
#[derive(Debug, Clone)]
pub struct SourceFetcher {
    http: HttpFetcher,
    file: FileFetcher,
}

impl SourceFetcher {
    /// Creates a fetcher from the fetch configuration.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        Ok(Self {
            http: HttpFetcher::new(Duration::from_secs(config.timeout_seconds))?,
            file: FileFetcher,
        })
    }

    /// Whether the URL is fetched over the network.
    #[must_use]
    pub fn is_remote(url: &str) -> bool {
        let lower = url.to_ascii_lowercase();
        lower.starts_with("http://") || lower.starts_with("https://")
    }
}

#[async_trait]
impl DatasetFetcher for SourceFetcher {
    async fn fetch(&self, dataset: &DatasetConfig) -> Result<Bytes> {
        if Self::is_remote(&dataset.url) {
            self.http.fetch(dataset).await
        } else {
            self.file.fetch(dataset).await
        }
    }
}

/// Caches documents of another fetcher by URL.
///
/// Concurrent requests for the same URL share one fetch. Failures are not cached.
pub struct CachedFetcher<F> {
    inner: F,
    cache: Cache<String, Bytes>,
}

impl<F: DatasetFetcher> CachedFetcher<F> {
    /// Wraps `inner` with a cache of `capacity` documents kept for `ttl`.
    pub fn new(inner: F, ttl: Duration, capacity: u64) -> Self {
        Self {
            inner,
            cache: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Wraps `inner` using the cache settings of the fetch configuration.
    pub fn from_config(inner: F, config: &FetchConfig) -> Self {
        Self::new(
            inner,
            Duration::from_secs(config.cache_ttl_seconds),
            config.cache_capacity,
        )
    }
}

#[async_trait]
impl<F: DatasetFetcher> DatasetFetcher for CachedFetcher<F> {
    async fn fetch(&self, dataset: &DatasetConfig) -> Result<Bytes> {
        self.cache
            .try_get_with(dataset.url.clone(), self.inner.fetch(dataset))
            .await
            .map_err(|e: Arc<TreemapError>| match e.as_ref() {
                TreemapError::DatasetLoad { dataset: key, reason } => {
                    TreemapError::dataset_load(key.clone(), reason)
                }
                other => TreemapError::dataset_load(&dataset.key, other),
            })
    }

    fn clear_cache(&self) {
        tracing::debug!(entries = self.cache.entry_count(), "Clearing dataset cache");
        self.cache.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_remote() {
        assert!(SourceFetcher::is_remote("https://example.com/a.json"));
        assert!(SourceFetcher::is_remote("HTTP://example.com/a.json"));
        assert!(!SourceFetcher::is_remote("file:///tmp/a.json"));
        assert!(!SourceFetcher::is_remote("data/a.json"));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_url_is_converted_to_path() {
        let dataset = DatasetConfig {
            key: "k".to_string(),
            url: "file:///tmp/kick%20starter.json".to_string(),
            title: String::new(),
            description: String::new(),
        };
        let path = FileFetcher::path(&dataset).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/kick starter.json"));
    }

    #[tokio::test]
    async fn test_missing_file_is_a_dataset_load_failure() {
        let dataset = DatasetConfig {
            key: "ghost".to_string(),
            url: "/definitely/not/here.json".to_string(),
            title: String::new(),
            description: String::new(),
        };
        let err = FileFetcher.fetch(&dataset).await.unwrap_err();
        assert!(err.is_dataset_load());
        assert!(err.to_string().contains("'ghost'"));
    }
}
