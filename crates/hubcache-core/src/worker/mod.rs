//! Offline worker lifecycle.
//!
//! Models one worker version moving through
//! `Uninstalled -> Installing -> Installed -> Activating -> Active`, with
//! `InstallFailed` as the error exit. The three operations mirror the
//! lifecycle events the hosting runtime would deliver, as plainly callable
//! methods.

pub mod manager;

pub use manager::{
    FetchOutcome, OfflineCacheManager, WorkerState, ASSET_MANIFEST, CACHE_GENERATION,
};
