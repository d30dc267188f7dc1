//! JSON fixture loading.
//!
//! `DataLoader` resolves a resource name such as `"stats"` to
//! `<origin><base_path>stats.json`, fetches it through a `Fetcher`, and keeps
//! successfully parsed values in its own cache for the loader's lifetime.
//!
//! Each attempt is bounded by a timeout; failed attempts are retried with a
//! linear backoff (`backoff_step * attempt`).

pub mod config;
pub mod error;
pub mod fetcher;
pub mod data_loader;

pub use config::LoaderConfig;
pub use error::{FetchError, LoadError};
pub use fetcher::{DirFetcher, Fetcher, HttpFetcher};
pub use data_loader::DataLoader;
