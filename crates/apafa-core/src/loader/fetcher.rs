//! Single-attempt fetch backends.
//!
//! A `Fetcher` performs exactly one GET-and-parse cycle. Retries, timeouts and
//! caching belong to `DataLoader`, so a backend never loops on its own.

use std::future::Future;
use std::path::{Path, PathBuf};

use reqwest::{header, Client};
use serde_json::Value;
use tracing::debug;

use super::FetchError;

pub trait Fetcher: Send + Sync {
    /// Fetch and parse one resource. `url` is the resolved resource URL,
    /// `name` the bare resource name it was built from.
    fn fetch(&self, name: &str, url: &str) -> impl Future<Output = Result<Value, FetchError>> + Send;
}

/// Fetches fixtures over HTTP.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> reqwest::Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self { client })
    }

    /// Wrap an existing client, sharing its connection pool
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, _name: &str, url: &str) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(url)
            .header(header::CACHE_CONTROL, "no-cache")
            .header(header::PRAGMA, "no-cache")
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::from_status(status, &body));
        }

        let body = response.text().await?;
        debug!(url = url, bytes = body.len(), "Fetched resource");
        Ok(serde_json::from_str(&body)?)
    }
}

/// Reads fixtures from a local directory as `<dir>/<name>.json`.
#[derive(Debug, Clone)]
pub struct DirFetcher {
    dir: PathBuf,
}

impl DirFetcher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn resource_path(&self, name: &str) -> Result<PathBuf, FetchError> {
        // Names are plain identifiers; refuse anything that could leave the directory
        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            return Err(FetchError::Network(format!("invalid resource name: {:?}", name)));
        }
        Ok(self.dir.join(format!("{}.json", name)))
    }
}

impl Fetcher for DirFetcher {
    async fn fetch(&self, name: &str, _url: &str) -> Result<Value, FetchError> {
        let path = self.resource_path(name)?;
        let contents = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| FetchError::Network(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), bytes = contents.len(), "Read resource");
        Ok(serde_json::from_str(&contents)?)
    }
}
