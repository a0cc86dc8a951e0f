//! Fetch layer: request/response model and network access.
//!
//! `Request` and `Response` are the currency of the whole crate - the cache
//! stores them, the worker routes them, the content indexes read them. The
//! `Fetcher` trait is the only place the network enters the picture.

pub mod client;
pub mod error;
pub mod request;

pub use client::{Fetcher, HttpFetcher};
pub use error::FetchError;
pub use request::{Destination, Method, Request, Response};
