//! Fixture source chosen at startup: HTTP or a local directory.

use anyhow::{Context, Result};
use apafa_core::{DirFetcher, FetchError, Fetcher, HttpFetcher};
use serde_json::Value;

use crate::config::Config;

pub enum Source {
    Http(HttpFetcher),
    Dir(DirFetcher),
}

impl Source {
    pub fn from_config(config: &Config) -> Result<Self> {
        match &config.data_dir {
            Some(dir) => Ok(Source::Dir(DirFetcher::new(dir))),
            None => Ok(Source::Http(
                HttpFetcher::new().context("Failed to build HTTP client")?,
            )),
        }
    }

    pub fn describe(&self, config: &Config) -> String {
        match self {
            Source::Http(_) => format!("{}{}", config.loader.origin, config.loader.base_path),
            Source::Dir(f) => f.dir().display().to_string(),
        }
    }
}

impl Fetcher for Source {
    async fn fetch(&self, name: &str, url: &str) -> Result<Value, FetchError> {
        match self {
            Source::Http(f) => f.fetch(name, url).await,
            Source::Dir(f) => f.fetch(name, url).await,
        }
    }
}
