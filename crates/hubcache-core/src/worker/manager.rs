//! The offline cache manager: install, activate, and fetch routing.
//!
//! One manager models one worker version. Lifecycle operations take
//! `&mut self` and are serialized by construction; `handle_fetch` takes
//! `&self`, so any number of fetches may be in flight while the store stays
//! read-only to runtime traffic.

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info, warn};

use crate::cache::{CacheStorage, CacheStore};
use crate::config::Config;
use crate::fetch::{Destination, FetchError, Fetcher, HttpFetcher, Request, Response};

// ============================================================================
// Constants
// ============================================================================

/// Cache generation identifier. Bump whenever ASSET_MANIFEST changes;
/// activation deletes every store not named by the current value.
pub const CACHE_GENERATION: &str = "community-hub-v1.0.0";

/// Origin-relative paths pre-cached at install time. The root document must
/// stay on this list for the offline navigation fallback to have anything
/// to serve.
pub const ASSET_MANIFEST: &[&str] = &[
    "/",
    "/index.html",
    "/news.html",
    "/resources.html",
    "/about.html",
    "/css/style.css",
    "/js/app.js",
    "/js/news.js",
    "/js/resources.js",
    "/data/news.json",
    "/data/resources.json",
    "/data/categories.json",
];

/// Served in place of a document request when both cache and network fail.
const OFFLINE_FALLBACK_PATH: &str = "/index.html";

/// Maximum concurrent manifest fetches during install.
/// 4 keeps install fast without hammering a small static host.
const INSTALL_CONCURRENCY: usize = 4;

// ============================================================================
// Types
// ============================================================================

/// Lifecycle of one worker version.
///
/// `InstallFailed` is the terminal error path: the version never reaches
/// `Installed`, a previously active version keeps serving, and a later
/// `install` call may retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Uninstalled,
    Installing,
    Installed,
    Activating,
    Active,
    InstallFailed,
}

/// Result of routing one fetch through the manager.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The manager does not intervene; default handling applies, untouched.
    PassThrough,
    Response(Response),
}

impl FetchOutcome {
    pub fn into_response(self) -> Option<Response> {
        match self {
            FetchOutcome::Response(response) => Some(response),
            FetchOutcome::PassThrough => None,
        }
    }
}

/// Offline cache manager for the hub site.
///
/// Pre-caches the asset manifest into a generation-named store, purges
/// stale generations on activation, and answers same-origin fetches
/// cache-first with a navigation fallback when fully offline.
pub struct OfflineCacheManager<F: Fetcher> {
    origin: String,
    storage: CacheStorage,
    fetcher: F,
    state: WorkerState,
    generation: Option<String>,
    store: Option<CacheStore>,
    skip_waiting: bool,
    claims_clients: bool,
}

impl OfflineCacheManager<HttpFetcher> {
    /// Production manager: storage under the configured cache directory,
    /// network over reqwest.
    pub fn from_config(config: &Config) -> Result<Self> {
        let storage = CacheStorage::open(config.cache_dir()?)?;
        let fetcher = HttpFetcher::new().context("Failed to build HTTP fetcher")?;
        Ok(Self::new(config.origin.clone(), storage, fetcher))
    }
}

impl<F: Fetcher> OfflineCacheManager<F> {
    pub fn new(origin: impl Into<String>, storage: CacheStorage, fetcher: F) -> Self {
        let origin = origin.into().trim_end_matches('/').to_string();
        Self {
            origin,
            storage,
            fetcher,
            state: WorkerState::Uninstalled,
            generation: None,
            store: None,
            skip_waiting: false,
            claims_clients: false,
        }
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn generation(&self) -> Option<&str> {
        self.generation.as_deref()
    }

    /// Whether this version signaled that it should bypass a waiting
    /// predecessor immediately (set on successful install).
    pub fn skip_waiting_signaled(&self) -> bool {
        self.skip_waiting
    }

    /// Whether this version claimed control of open sessions (set on
    /// activation).
    pub fn claims_clients(&self) -> bool {
        self.claims_clients
    }

    /// Pre-cache every manifest path into the store named by `generation`.
    ///
    /// All-or-nothing: any network error or non-2xx status fails the install
    /// as a whole and the worker lands in `InstallFailed` instead of
    /// `Installed`. Nothing is written to the store until every asset has
    /// been fetched successfully.
    pub async fn install(&mut self, manifest: &[&str], generation: &str) -> Result<()> {
        if !matches!(
            self.state,
            WorkerState::Uninstalled | WorkerState::InstallFailed
        ) {
            anyhow::bail!("install is only valid from Uninstalled, state is {:?}", self.state);
        }
        self.state = WorkerState::Installing;
        info!(generation, assets = manifest.len(), "installing worker");

        let mut store = match self.storage.open_store(generation) {
            Ok(store) => store,
            Err(e) => {
                self.state = WorkerState::InstallFailed;
                return Err(e).context("Failed to open cache store for install");
            }
        };

        let origin = self.origin.clone();
        let fetcher = &self.fetcher;
        let fetched: Result<Vec<(Request, Response)>, FetchError> =
            stream::iter(manifest.iter().copied())
                .map(|path| {
                    let url = format!("{}{}", origin, path);
                    async move {
                        let request = Request::get(url);
                        let response = fetcher.fetch(&request).await?;
                        if !response.is_success() {
                            return Err(FetchError::asset_unavailable(path, response.status));
                        }
                        Ok((request, response))
                    }
                })
                .buffered(INSTALL_CONCURRENCY)
                .try_collect()
                .await;

        let pairs = match fetched {
            Ok(pairs) => pairs,
            Err(e) => {
                self.state = WorkerState::InstallFailed;
                warn!(generation, error = %e, "install failed, previous version keeps serving");
                return Err(e).context("Failed to pre-cache asset manifest");
            }
        };

        for (request, response) in pairs {
            if let Err(e) = store.put(&request, response) {
                self.state = WorkerState::InstallFailed;
                return Err(e).context("Failed to write pre-cached entry");
            }
        }

        let entries = store.len();
        self.generation = Some(generation.to_string());
        self.store = Some(store);
        self.skip_waiting = true;
        self.state = WorkerState::Installed;
        info!(generation, entries, "worker installed");
        Ok(())
    }

    /// Delete every store whose name is not `generation` and take control
    /// of open sessions.
    ///
    /// Cleanup is best-effort: a store that fails to delete is logged and
    /// skipped, never retried, and never aborts activation.
    pub fn activate(&mut self, generation: &str) -> Result<()> {
        if self.state != WorkerState::Installed {
            anyhow::bail!("activate is only valid from Installed, state is {:?}", self.state);
        }
        self.state = WorkerState::Activating;
        info!(generation, "activating worker");

        let names = self
            .storage
            .store_names()
            .context("Failed to enumerate cache stores")?;
        for name in names {
            if name == generation {
                continue;
            }
            match self.storage.delete_store(&name) {
                Ok(true) => info!(store = %name, "cleared old cache"),
                Ok(false) => {}
                Err(e) => warn!(store = %name, error = %e, "failed to clear old cache"),
            }
        }

        if self.store.as_ref().map(|s| s.name()) != Some(generation) {
            let store = self
                .storage
                .open_store(generation)
                .context("Failed to open active cache store")?;
            self.store = Some(store);
            self.generation = Some(generation.to_string());
        }

        self.claims_clients = true;
        self.state = WorkerState::Active;
        info!(generation, "worker active");
        Ok(())
    }

    /// Route one fetch: cache-first for same-origin requests, network on
    /// miss, cached root document when a navigation fails entirely.
    ///
    /// Never writes to the store; runtime responses are not cached.
    pub async fn handle_fetch(&self, request: &Request) -> Result<FetchOutcome, FetchError> {
        if self.state != WorkerState::Active {
            debug!(url = %request.url, state = ?self.state, "worker not active, passing through");
            return Ok(FetchOutcome::PassThrough);
        }
        if !request.is_same_origin(&self.origin) {
            debug!(url = %request.url, "cross-origin request, passing through");
            return Ok(FetchOutcome::PassThrough);
        }

        if let Some(response) = self.lookup(request) {
            debug!(url = %request.url, "cache hit");
            return Ok(FetchOutcome::Response(response));
        }

        match self.fetcher.fetch(request).await {
            Ok(response) => Ok(FetchOutcome::Response(response)),
            Err(err) if request.destination == Destination::Document => {
                warn!(url = %request.url, error = %err, "offline navigation, serving cached root");
                let fallback =
                    Request::document(format!("{}{}", self.origin, OFFLINE_FALLBACK_PATH));
                match self.lookup(&fallback) {
                    Some(response) => Ok(FetchOutcome::Response(response)),
                    // Only as reliable as the manifest: nothing to serve if
                    // the root document was never pre-cached.
                    None => Err(FetchError::NotCached(OFFLINE_FALLBACK_PATH.to_string())),
                }
            }
            Err(err) => Err(err),
        }
    }

    fn lookup(&self, request: &Request) -> Option<Response> {
        self.store.as_ref().and_then(|s| s.lookup(request)).cloned()
    }
}

// ============================================================================
// Tests
// ============================================================================
