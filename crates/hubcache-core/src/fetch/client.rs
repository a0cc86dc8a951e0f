//! Network access behind the `Fetcher` seam.
//!
//! The worker never talks to `reqwest` directly; it goes through `Fetcher`,
//! so tests can stand in an in-memory double and drive every lifecycle path
//! without a network.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{FetchError, Method, Request, Response};

/// HTTP request timeout in seconds.
/// 30s allows for slow origins while failing fast enough to fall back.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// The network side of the cache manager.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Perform one network fetch. Non-2xx statuses are responses, not
    /// errors; only transport failures error.
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError>;
}

/// Production fetcher backed by reqwest.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
        debug!(method = request.method.as_str(), url = %request.url, "network fetch");

        let builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Head => self.client.head(&request.url),
            Method::Post => self.client.post(&request.url),
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();

        let mut headers = BTreeMap::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers.insert(name.to_string(), value.to_string());
            }
        }

        let body = response.bytes().await?.to_vec();
        debug!(url = %request.url, status, bytes = body.len(), "network response");

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}
