//! Core library for the APAFA web renderer.
//!
//! - `loader`: fetches named JSON fixtures with timeout, retries and a
//!   per-loader cache
//! - `models`: typed shapes of every fixture the pages consume
//! - `utils`: currency, percentage, date and HTML escaping helpers
//! - `document`: slot-based page document and the DOM-style update helpers
//! - `pages`: one render pipeline per site page

pub mod document;
pub mod loader;
pub mod models;
pub mod pages;
pub mod utils;

pub use document::{Document, SlotDocument};
pub use loader::{DataLoader, DirFetcher, FetchError, Fetcher, HttpFetcher, LoadError, LoaderConfig};
pub use pages::{LoadPolicy, Page, RenderContext};
