//! Named cache stores for offline asset storage.
//!
//! One store per cache generation, persisted as a JSON file under the
//! storage root. Entries are keyed by normalized request and written only
//! at install time; `activate` deletes whole stores, never single entries.

pub mod store;

pub use store::{CacheEntry, CacheStorage, CacheStore};
