//! News loading and query operations for the news and article pages.

use anyhow::{Context, Result};
use tracing::info;

use crate::fetch::{Fetcher, Request};
use crate::models::{NewsArticle, NewsFeed};
use crate::worker::OfflineCacheManager;

/// Site path of the news data file.
const NEWS_DATA_PATH: &str = "/data/news.json";

/// Number of articles on the homepage strip.
const LATEST_COUNT: usize = 3;

/// Number of related articles shown under a full article.
const RELATED_COUNT: usize = 3;

/// Loaded news data plus the category filter the news page keeps.
#[derive(Debug, Default)]
pub struct NewsIndex {
    articles: Vec<NewsArticle>,
    filter: Option<String>,
}

impl NewsIndex {
    /// Load the news feed through the cache manager, so the pre-seeded copy
    /// serves when the device is offline.
    pub async fn load<F: Fetcher>(manager: &OfflineCacheManager<F>) -> Result<Self> {
        let request = Request::data(format!("{}{}", manager.origin(), NEWS_DATA_PATH));
        let outcome = manager
            .handle_fetch(&request)
            .await
            .context("Failed to load news data")?;
        let response = outcome
            .into_response()
            .context("News data request left the site origin")?;
        if !response.is_success() {
            anyhow::bail!("Failed to load news data: status {}", response.status);
        }

        let feed: NewsFeed = response.json().context("Failed to parse news data")?;
        info!(count = feed.news.len(), "loaded news articles");
        Ok(Self {
            articles: feed.news,
            filter: None,
        })
    }

    pub fn from_articles(articles: Vec<NewsArticle>) -> Self {
        Self {
            articles,
            filter: None,
        }
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Restrict `filtered` to one category key; `None` shows everything.
    pub fn set_filter(&mut self, category: Option<&str>) {
        self.filter = category.map(str::to_string);
    }

    /// The homepage strip: newest articles first.
    pub fn latest(&self, n: usize) -> Vec<&NewsArticle> {
        let mut sorted = self.sorted_newest_first();
        sorted.truncate(n);
        sorted
    }

    pub fn latest_default(&self) -> Vec<&NewsArticle> {
        self.latest(LATEST_COUNT)
    }

    /// Articles flagged as important announcements, in feed order.
    pub fn important(&self) -> Vec<&NewsArticle> {
        self.articles.iter().filter(|a| a.important).collect()
    }

    /// The news page listing: current filter applied, newest first.
    pub fn filtered(&self) -> Vec<&NewsArticle> {
        let mut articles: Vec<&NewsArticle> = match &self.filter {
            Some(category) => self
                .articles
                .iter()
                .filter(|a| a.category == *category)
                .collect(),
            None => self.articles.iter().collect(),
        };
        articles.sort_by(|a, b| b.published_on().cmp(&a.published_on()));
        articles
    }

    pub fn article(&self, id: i64) -> Option<&NewsArticle> {
        self.articles.iter().find(|a| a.id == id)
    }

    /// Related strip on the article page: same category, excluding the
    /// article itself, in feed order.
    pub fn related(&self, id: i64, n: usize) -> Vec<&NewsArticle> {
        let Some(current) = self.article(id) else {
            return Vec::new();
        };
        self.articles
            .iter()
            .filter(|a| a.id != id && a.category == current.category)
            .take(n)
            .collect()
    }

    pub fn related_default(&self, id: i64) -> Vec<&NewsArticle> {
        self.related(id, RELATED_COUNT)
    }

    fn sorted_newest_first(&self) -> Vec<&NewsArticle> {
        let mut articles: Vec<&NewsArticle> = self.articles.iter().collect();
        articles.sort_by(|a, b| b.published_on().cmp(&a.published_on()));
        articles
    }
}
