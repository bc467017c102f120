//! Read-only resource sources for the date index and per-date snapshots.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP client build error: {0}")]
    HttpClientBuild(String),
    #[error("HTTP request failed for {url}: {message}")]
    HttpRequest { url: String, message: String },
    #[error("unexpected HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },
    #[error("resource {path} could not be read: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("resource path {0} escapes the data directory")]
    InvalidPath(String),
}

/// Fetches a resource by its site-relative path (e.g. `data/date.json`).
#[async_trait]
pub trait ResourceSource: Send + Sync {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError>;

    fn describe(&self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBust {
    Timestamp,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSourceConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub cache_bust: CacheBust,
}

impl HttpSourceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms: 15_000,
            cache_bust: CacheBust::Timestamp,
        }
    }
}

pub struct HttpSource {
    client: reqwest::Client,
    cfg: HttpSourceConfig,
}

impl HttpSource {
    pub fn new(cfg: HttpSourceConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(|err| FetchError::HttpClientBuild(err.to_string()))?;
        Ok(Self { client, cfg })
    }

    pub fn resource_url(&self, path: &str) -> String {
        join_url(&self.cfg.base_url, path)
    }
}

#[async_trait]
impl ResourceSource for HttpSource {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let mut url = self.resource_url(path);
        if self.cfg.cache_bust == CacheBust::Timestamp {
            url = cache_busted_url(&url, Utc::now().timestamp_millis());
        }

        debug!(component = "source", event = "source.fetch", url = %url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| FetchError::HttpRequest {
                url: url.clone(),
                message: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        response
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(|err| FetchError::HttpRequest {
                url,
                message: err.to_string(),
            })
    }

    fn describe(&self) -> String {
        format!("http:{}", self.cfg.base_url)
    }
}

/// Serves resources from a local checkout of the published site.
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, FetchError> {
        let relative = Path::new(path.trim_start_matches('/'));
        let escapes = relative.components().any(|part| {
            !matches!(
                part,
                std::path::Component::Normal(_) | std::path::Component::CurDir
            )
        });
        if escapes {
            return Err(FetchError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ResourceSource for DirSource {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let full = self.resolve(path)?;
        debug!(component = "source", event = "source.fetch", path = %full.display());
        tokio::fs::read(&full)
            .await
            .map_err(|source| FetchError::Io { path: full, source })
    }

    fn describe(&self) -> String {
        format!("dir:{}", self.root.display())
    }
}

pub fn join_url(base: &str, path: &str) -> String {
    if base.is_empty() {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Appends `_=<stamp>` so intermediate caches see a distinct URL per load.
pub fn cache_busted_url(url: &str, stamp: i64) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}_={stamp}")
}
