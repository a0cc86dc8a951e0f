//! Request and response types the cache layer operates on.
//!
//! These are deliberately independent of any event-loop or server binding:
//! the worker's lifecycle operations take and return these values directly,
//! so every code path is testable by plain invocation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// HTTP method, canonical by construction (no case normalization needed).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Method {
    #[default]
    Get,
    Head,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
        }
    }
}

/// What kind of consumer a request is fetching for.
///
/// Only `Document` (a top-level page load) is eligible for the offline
/// fallback; sub-resources surface their failures to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Destination {
    Document,
    Style,
    Script,
    Image,
    /// Data fetched by page scripts (the site's JSON files).
    Data,
    #[default]
    Other,
}

/// An outbound request as seen by the cache manager.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub destination: Destination,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>, destination: Destination) -> Self {
        Self {
            method,
            url: url.into(),
            destination,
        }
    }

    /// Plain GET for a sub-resource.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url, Destination::Other)
    }

    /// GET for a top-level page load.
    pub fn document(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url, Destination::Document)
    }

    /// GET for a JSON data file.
    pub fn data(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url, Destination::Data)
    }

    /// Normalized store key: method plus the URL with any fragment stripped.
    /// Fragments never reach the server, so two URLs differing only in
    /// fragment must hit the same entry.
    pub fn cache_key(&self) -> String {
        let url = match self.url.split_once('#') {
            Some((before, _)) => before,
            None => self.url.as_str(),
        };
        format!("{} {}", self.method.as_str(), url)
    }

    /// Whether this request stays on the worker's own origin.
    ///
    /// Prefix test over the URL string, the same scope guard the site's
    /// pages rely on. `origin` must not carry a trailing slash.
    pub fn is_same_origin(&self, origin: &str) -> bool {
        self.url.starts_with(origin)
    }
}

/// A response as stored in (or proxied through) the cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: Vec::new(),
        }
    }

    /// 200 response with the given body.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as UTF-8 text, if it is valid UTF-8.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Deserialize the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }
}
