//! Content indexes backing the site's pages.
//!
//! Each index loads its data file through the cache manager's fetch path,
//! so the same code serves live data online and the pre-seeded copy
//! offline. Rendering is the pages' concern; these types only answer the
//! queries the pages ask (latest, important, filter, search, related).

pub mod news;
pub mod resources;

pub use news::NewsIndex;
pub use resources::ResourceIndex;
