//! Core library for hubcache - the offline layer of the community hub site.
//!
//! The site itself is static HTML backed by JSON data files. This crate
//! provides everything that makes it usable offline:
//!
//! - `worker`: the offline cache manager (install, activate, fetch routing)
//! - `cache`: generation-named stores holding the pre-cached assets
//! - `fetch`: request/response model and the network seam
//! - `models` and `content`: the site's news and resource data with the
//!   query operations its pages perform
//! - `config`: deployment configuration (origin, generation, manifest)

pub mod cache;
pub mod config;
pub mod content;
pub mod fetch;
pub mod models;
pub mod utils;
pub mod worker;

pub use cache::{CacheEntry, CacheStorage, CacheStore};
pub use config::Config;
pub use content::{NewsIndex, ResourceIndex};
pub use fetch::{Destination, FetchError, Fetcher, HttpFetcher, Method, Request, Response};
pub use models::{NewsArticle, NewsCategory, NewsFeed, Resource, ResourceDirectory};
pub use worker::{
    FetchOutcome, OfflineCacheManager, WorkerState, ASSET_MANIFEST, CACHE_GENERATION,
};
