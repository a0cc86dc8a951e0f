//! Resource directory loading, filtering, and search for the resources page.

use anyhow::{Context, Result};
use tracing::info;

use crate::fetch::{Fetcher, Request};
use crate::models::{Resource, ResourceDirectory};
use crate::worker::OfflineCacheManager;

/// Site path of the resources data file.
const RESOURCES_DATA_PATH: &str = "/data/resources.json";

/// Loaded resource directory plus the category filter and search query the
/// resources page keeps.
#[derive(Debug, Default)]
pub struct ResourceIndex {
    directory: ResourceDirectory,
    category: Option<String>,
    query: String,
}

impl ResourceIndex {
    /// Load the resource directory through the cache manager, so the
    /// pre-seeded copy serves when the device is offline.
    pub async fn load<F: Fetcher>(manager: &OfflineCacheManager<F>) -> Result<Self> {
        let request = Request::data(format!("{}{}", manager.origin(), RESOURCES_DATA_PATH));
        let outcome = manager
            .handle_fetch(&request)
            .await
            .context("Failed to load resources data")?;
        let response = outcome
            .into_response()
            .context("Resources data request left the site origin")?;
        if !response.is_success() {
            anyhow::bail!("Failed to load resources data: status {}", response.status);
        }

        let directory: ResourceDirectory =
            response.json().context("Failed to parse resources data")?;
        info!(
            categories = directory.categories.len(),
            resources = directory.len(),
            "loaded resource directory"
        );
        Ok(Self {
            directory,
            category: None,
            query: String::new(),
        })
    }

    pub fn from_directory(directory: ResourceDirectory) -> Self {
        Self {
            directory,
            category: None,
            query: String::new(),
        }
    }

    pub fn directory(&self) -> &ResourceDirectory {
        &self.directory
    }

    /// Restrict results to one category key; `None` searches everything.
    pub fn set_category(&mut self, category: Option<&str>) {
        self.category = category.map(str::to_string);
    }

    /// Free-text query over name, location, services, and type. Leading and
    /// trailing whitespace is ignored; an empty query matches everything.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.trim().to_string();
    }

    /// Resources within the selected category that match the query.
    pub fn results(&self) -> Vec<&Resource> {
        let scope: Vec<&Resource> = match &self.category {
            Some(key) => self.directory.category(key).iter().collect(),
            None => self.directory.all(),
        };
        if self.query.is_empty() {
            return scope;
        }
        scope
            .into_iter()
            .filter(|r| r.matches(&self.query))
            .collect()
    }

    /// Results grouped by category for sectioned display, with the selected
    /// category always present (possibly empty) and other categories only
    /// when they have matches.
    pub fn grouped(&self) -> Vec<(&str, Vec<&Resource>)> {
        match &self.category {
            Some(key) => {
                let matches: Vec<&Resource> = self
                    .directory
                    .category(key)
                    .iter()
                    .filter(|r| self.query.is_empty() || r.matches(&self.query))
                    .collect();
                vec![(key.as_str(), matches)]
            }
            None => self
                .directory
                .categories
                .iter()
                .filter_map(|(key, resources)| {
                    let matches: Vec<&Resource> = resources
                        .iter()
                        .filter(|r| self.query.is_empty() || r.matches(&self.query))
                        .collect();
                    if matches.is_empty() {
                        None
                    } else {
                        Some((key.as_str(), matches))
                    }
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> ResourceIndex {
        let json = r#"{
            "health_facilities": [
                {"id": 1, "type": "hospital", "name": "Tenwek Hospital",
                 "location": "Bomet East", "services": ["Emergency Care", "Maternity"]},
                {"id": 2, "type": "health_center", "name": "Longisa Health Centre",
                 "location": "Longisa", "services": ["Outpatient"]}
            ],
            "agricultural_services": [
                {"id": 3, "type": "cooperative", "name": "Tea Growers Cooperative",
                 "location": "Sotik", "services": ["Tea Collection", "Farm Inputs"]}
            ],
            "government_offices": [
                {"id": 4, "type": "administration", "name": "County Headquarters",
                 "location": "Bomet Town", "services": ["Permits", "Registration"]}
            ]
        }"#;
        ResourceIndex::from_directory(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_results_default_to_everything() {
        let index = index();
        assert_eq!(index.results().len(), 4);
        assert_eq!(index.directory().len(), 4);
    }

    #[test]
    fn test_category_filter_scopes_results() {
        let mut index = index();
        index.set_category(Some("health_facilities"));
        let names: Vec<&str> = index.results().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Tenwek Hospital", "Longisa Health Centre"]);
    }

    #[test]
    fn test_search_applies_within_selected_category() {
        let mut index = index();
        index.set_category(Some("health_facilities"));
        index.set_query("bomet");
        let names: Vec<&str> = index.results().iter().map(|r| r.name.as_str()).collect();
        // County Headquarters is also in Bomet but outside the category.
        assert_eq!(names, vec!["Tenwek Hospital"]);
    }

    #[test]
    fn test_search_is_case_insensitive_and_trimmed() {
        let mut index = index();
        index.set_query("  TEA  ");
        let names: Vec<&str> = index.results().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Tea Growers Cooperative"]);
    }

    #[test]
    fn test_no_matches_yields_empty_results() {
        let mut index = index();
        index.set_query("airport");
        assert!(index.results().is_empty());
    }

    #[test]
    fn test_grouped_skips_empty_categories() {
        let mut index = index();
        index.set_query("maternity");
        let grouped = index.grouped();
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].0, "health_facilities");
        assert_eq!(grouped[0].1.len(), 1);
    }

    #[test]
    fn test_grouped_keeps_selected_category_when_empty() {
        let mut index = index();
        index.set_category(Some("agricultural_services"));
        index.set_query("maternity");
        let grouped = index.grouped();
        assert_eq!(grouped.len(), 1);
        assert!(grouped[0].1.is_empty());
    }
}
