//! Data models for the site's JSON content.
//!
//! - `NewsArticle`, `NewsFeed`, `NewsCategory`: articles from `data/news.json`
//! - `Resource`, `ResourceDirectory`: the directory from `data/resources.json`

pub mod news;
pub mod resource;

pub use news::{NewsArticle, NewsCategory, NewsFeed};
pub use resource::{category_display, Resource, ResourceDirectory};
