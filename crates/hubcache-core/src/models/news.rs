use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::format_date;

/// News category taxonomy used across the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewsCategory {
    Agriculture,
    Health,
    Education,
    Infrastructure,
    Market,
    Weather,
    Unknown,
}

impl NewsCategory {
    /// Parse a category key into a NewsCategory enum value.
    /// Keys the site doesn't know about map to `Unknown` and are displayed
    /// by their raw key instead.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "agriculture" => NewsCategory::Agriculture,
            "health" => NewsCategory::Health,
            "education" => NewsCategory::Education,
            "infrastructure" => NewsCategory::Infrastructure,
            "market" => NewsCategory::Market,
            "weather" => NewsCategory::Weather,
            _ => NewsCategory::Unknown,
        }
    }

    /// Get the display name for this category.
    pub fn display_name(&self) -> &'static str {
        match self {
            NewsCategory::Agriculture => "Agriculture",
            NewsCategory::Health => "Health",
            NewsCategory::Education => "Education",
            NewsCategory::Infrastructure => "Infrastructure",
            NewsCategory::Market => "Market",
            NewsCategory::Weather => "Weather",
            NewsCategory::Unknown => "General",
        }
    }
}

/// One article from `data/news.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub id: i64,
    pub title: String,
    pub summary: String,
    /// Full article body; older entries only carry a summary.
    #[serde(default)]
    pub content: Option<String>,
    pub date: String,
    pub category: String,
    pub source: String,
    #[serde(default)]
    pub important: bool,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl NewsArticle {
    pub fn category(&self) -> NewsCategory {
        NewsCategory::from_str(&self.category)
    }

    /// Display name for the category, falling back to the raw key for
    /// categories the taxonomy doesn't know.
    pub fn category_display(&self) -> &str {
        match self.category() {
            NewsCategory::Unknown => &self.category,
            known => known.display_name(),
        }
    }

    pub fn formatted_date(&self) -> String {
        format_date(&self.date)
    }

    /// Calendar date for ordering. Entries with unparseable dates sort last.
    pub fn published_on(&self) -> Option<NaiveDate> {
        if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(&self.date) {
            return Some(dt.date_naive());
        }
        let prefix: String = self.date.chars().take(10).collect();
        NaiveDate::parse_from_str(&prefix, "%Y-%m-%d").ok()
    }
}

/// Top-level shape of `data/news.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsFeed {
    pub news: Vec<NewsArticle>,
}
